//! String-backed representation.
//!
//! The message owns its source text and lazily slices sub-elements on
//! demand; mutations are in-place string edits.

pub mod cursor;
pub mod message;
mod span;

pub use cursor::{Cursor, CursorMut};
pub use message::Message;
