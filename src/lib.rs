//! hl7msg - HL7 v2.x message tree
//!
//! Parse, navigate, mutate and emit pipe-and-hat delimited messages.
//!
//! Two interchangeable representations:
//! - [`Message`]: the source string is the source of truth; elements
//!   are lazily sliced spans (fast ingest, cheap reads)
//! - [`MessageBuilder`]: an owned node graph re-joined on read
//!   (fast incremental construction)
//!
//! Both expose the same six-level element tree - message, segment,
//! field, repetition, component, subcomponent - with 1-based indexing,
//! the segment type code at index 0, and the MSH-1/MSH-2 delimiter
//! declarations handled as fixed positions.
//!
//! ```
//! use hl7msg::{Element, Message, Path};
//!
//! let m = Message::parse("MSH|^~\\&|\rPID|1||A^B&C~D").unwrap();
//! assert_eq!(m.value_count(), 2);
//! let field = m.segment(2).unwrap().child(3);
//! assert_eq!(field.value().as_deref(), Some("A^B&C~D"));
//! assert_eq!(
//!     m.get_value(Path::segment(2).field(3).repetition(2)).as_deref(),
//!     Some("D")
//! );
//! ```

pub mod builder;
pub mod core;
pub mod details;
pub mod element;
pub mod error;
pub mod parser;

pub use builder::MessageBuilder;
pub use details::MessageDetails;
pub use self::core::escape::{escape, unescape};
pub use self::core::sanitize;
pub use self::core::separators::Separators;
pub use element::{Detached, Element, ElementMut, Level, Path};
pub use error::{Hl7Error, Result};
pub use parser::Message;
