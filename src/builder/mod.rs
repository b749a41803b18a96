//! Node-backed representation.
//!
//! The message owns a sparse node graph and re-serializes on read;
//! mutations are map operations on child indices.

pub mod cursor;
pub mod message;
mod node;

pub use cursor::{Cursor, CursorMut};
pub use message::MessageBuilder;
