//! Error taxonomy for parsing and tree mutation.
//!
//! Every kind carries a stable numeric code so callers can match on
//! faults across versions without string comparison.

use thiserror::Error;

/// Faults raised by parsing, navigation and mutation.
///
/// All of these are pre-condition violations at the API boundary: a
/// failing operation leaves the message tree unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Hl7Error {
    /// Parse or set received empty input.
    #[error("message data must not be empty")]
    EmptyMessage,

    /// Input is shorter than the minimal `MSH|^~\&|` header.
    #[error("message data is too short: {0} bytes, minimum 8")]
    MessageTooShort(usize),

    /// Input does not begin with the MSH type code.
    #[error("message data must start with MSH")]
    MissingHeader,

    /// Segment lookup with an index below 1.
    #[error("segment index must be greater than zero")]
    SegmentIndexMustBePositive,

    /// Move of MSH-1, MSH-2, a segment type code, or a whole message.
    #[error("element at a fixed position cannot be moved")]
    MoveForbidden,

    /// Delete of a whole message or of the MSH segment.
    #[error("element cannot be deleted")]
    DeleteForbidden,

    /// Move or insert target below the first valid position.
    #[error("target index must be at least 1, got {0}")]
    IndexBelowMinimum(usize),

    /// Any other structural violation of a fixed position: rewriting
    /// beneath MSH-1/MSH-2, shifting them sideways, malformed type
    /// codes, or addressing below a leaf.
    #[error("fixed position cannot be restructured")]
    FixedFieldViolation,

    /// A delimiter write would make two separators collide, or a
    /// separator is not a usable ASCII delimiter character.
    #[error("separator characters must be distinct ASCII punctuation")]
    SeparatorsNotDistinct,
}

impl Hl7Error {
    /// Stable numeric code for this fault kind.
    pub fn code(&self) -> u16 {
        match self {
            Hl7Error::EmptyMessage => 1,
            Hl7Error::MessageTooShort(_) => 2,
            Hl7Error::MissingHeader => 3,
            Hl7Error::SegmentIndexMustBePositive => 4,
            Hl7Error::MoveForbidden => 5,
            Hl7Error::DeleteForbidden => 6,
            Hl7Error::IndexBelowMinimum(_) => 7,
            Hl7Error::FixedFieldViolation => 8,
            Hl7Error::SeparatorsNotDistinct => 9,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Hl7Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(Hl7Error::EmptyMessage.code(), 1);
        assert_eq!(Hl7Error::MessageTooShort(3).code(), 2);
        assert_eq!(Hl7Error::MissingHeader.code(), 3);
        assert_eq!(Hl7Error::SegmentIndexMustBePositive.code(), 4);
        assert_eq!(Hl7Error::MoveForbidden.code(), 5);
        assert_eq!(Hl7Error::DeleteForbidden.code(), 6);
        assert_eq!(Hl7Error::IndexBelowMinimum(0).code(), 7);
        assert_eq!(Hl7Error::FixedFieldViolation.code(), 8);
        assert_eq!(Hl7Error::SeparatorsNotDistinct.code(), 9);
    }

    #[test]
    fn test_display_mentions_minimum_length() {
        let msg = Hl7Error::MessageTooShort(5).to_string();
        assert!(msg.contains("5"));
        assert!(msg.contains("8"));
    }
}
