//! Separator set for one message.
//!
//! Five characters drive the split into segments, fields, repetitions,
//! components and subcomponents. The segment terminator is always CR;
//! the remaining four plus the escape character are declared by the
//! message itself in MSH-1 and MSH-2.

use crate::error::{Hl7Error, Result};

/// The delimiter characters of a single message.
///
/// Defaults to the standard `|^~\&` set. All five are ASCII and
/// pairwise distinct; alphanumeric characters are rejected because
/// they would collide with escape-sequence letters and hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separators {
    /// Field delimiter (MSH-1).
    pub field: char,
    /// Component delimiter (MSH-2, position 1).
    pub component: char,
    /// Repetition delimiter (MSH-2, position 2).
    pub repetition: char,
    /// Escape character (MSH-2, position 3).
    pub escape: char,
    /// Subcomponent delimiter (MSH-2, position 4).
    pub subcomponent: char,
}

impl Default for Separators {
    fn default() -> Self {
        Separators {
            field: '|',
            component: '^',
            repetition: '~',
            escape: '\\',
            subcomponent: '&',
        }
    }
}

impl Separators {
    /// Segment terminator. Fixed by the wire format, never declared.
    pub const SEGMENT: char = '\r';

    /// Build a separator set, validating it.
    pub fn new(
        field: char,
        component: char,
        repetition: char,
        escape: char,
        subcomponent: char,
    ) -> Result<Self> {
        let seps = Separators {
            field,
            component,
            repetition,
            escape,
            subcomponent,
        };
        seps.validate()?;
        Ok(seps)
    }

    /// Derive the set from a raw MSH header.
    ///
    /// `header` is the message text (or its first segment); byte 3 is
    /// the field delimiter and bytes 4..8 are the encoding characters.
    /// Missing positions fall back to the defaults.
    pub fn from_header(header: &str) -> Result<Self> {
        let d = Separators::default();
        let b = header.as_bytes();
        let at = |i: usize, fallback: char| b.get(i).map(|&c| c as char).unwrap_or(fallback);
        Separators::new(
            at(3, d.field),
            at(4, d.component),
            at(5, d.repetition),
            at(6, d.escape),
            at(7, d.subcomponent),
        )
    }

    /// The four MSH-2 encoding characters, in declaration order.
    pub fn encoding_characters(&self) -> String {
        let mut s = String::with_capacity(4);
        s.push(self.component);
        s.push(self.repetition);
        s.push(self.escape);
        s.push(self.subcomponent);
        s
    }

    /// The canonical empty header this set produces.
    pub fn header(&self) -> String {
        let mut s = String::with_capacity(9);
        s.push_str("MSH");
        s.push(self.field);
        s.push_str(&self.encoding_characters());
        s.push(self.field);
        s
    }

    /// All five declared delimiters, field first.
    pub(crate) fn all(&self) -> [char; 5] {
        [
            self.field,
            self.component,
            self.repetition,
            self.escape,
            self.subcomponent,
        ]
    }

    fn validate(&self) -> Result<()> {
        let chars = self.all();
        for (i, &c) in chars.iter().enumerate() {
            if !c.is_ascii() || c.is_ascii_alphanumeric() || c == Self::SEGMENT || c == '\n' {
                return Err(Hl7Error::SeparatorsNotDistinct);
            }
            if chars[i + 1..].contains(&c) {
                return Err(Hl7Error::SeparatorsNotDistinct);
            }
        }
        Ok(())
    }
}
