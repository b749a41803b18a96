//! Core primitives shared by both message representations:
//! - Separators: the five delimiter characters of a message
//! - Escape: reserved-character escape/unescape with Cow (zero-copy when possible)
//! - Sanitation: line-ending normalization on ingest

pub mod escape;
pub mod separators;

use crate::core::separators::Separators;
use crate::error::{Hl7Error, Result};

/// Normalize line endings to the CR segment terminator.
///
/// `\r\n` and lone `\n` both become CR; trailing terminators are
/// trimmed so a terminator-final wire message and its trimmed form
/// address identically. Applied on ingest and on equality comparison.
pub fn sanitize(input: &str) -> String {
    let mut out = input.replace("\r\n", "\r").replace('\n', "\r");
    out.truncate(out.trim_end_matches(Separators::SEGMENT).len());
    out
}

/// Sanitize and validate raw message text for ingest.
pub(crate) fn validate_message_text(input: &str) -> Result<String> {
    if input.is_empty() {
        return Err(Hl7Error::EmptyMessage);
    }
    let text = sanitize(input);
    if text.len() < 8 {
        return Err(Hl7Error::MessageTooShort(text.len()));
    }
    if !text.starts_with("MSH") {
        return Err(Hl7Error::MissingHeader);
    }
    Ok(text)
}

/// Type codes are three uppercase ASCII letters or digits.
pub(crate) fn validate_type_code(value: &str) -> Result<()> {
    let ok = value.len() == 3
        && value
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(Hl7Error::FixedFieldViolation)
    }
}
