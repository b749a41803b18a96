//! Escape and unescape of reserved delimiter characters.
//!
//! Field values may not contain raw delimiters; they travel as
//! `\F\ \S\ \T\ \R\ \E\` sequences between two escape characters.
//! Hex (`\Xhh..\`), local (`\Zhh..\`) and the `\.br\` break hint are
//! recognized on decode. Uses Cow for zero-copy when nothing needs
//! transforming.
//!
//! Escape is not idempotent: apply it exactly once before emission.

use std::borrow::Cow;

use memchr::{memchr, memchr2, memchr3};

use crate::core::separators::Separators;

/// Replace reserved characters in `input` by their escape sequences.
///
/// Returns Borrowed when no reserved character occurs. Existing
/// `\Xhh..\` and `\Zhh..\` sequences pass through verbatim.
pub fn escape<'a>(input: &'a str, seps: &Separators) -> Cow<'a, str> {
    let b = input.as_bytes();
    let fd = seps.field as u8;
    let comp = seps.component as u8;
    let rep = seps.repetition as u8;
    let esc = seps.escape as u8;
    let sub = seps.subcomponent as u8;

    // Fast path: nothing reserved in the input
    if memchr3(fd, comp, rep, b).is_none() && memchr2(esc, sub, b).is_none() {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 8);
    let mut lit = 0usize;
    let mut i = 0usize;
    while i < b.len() {
        let c = b[i];
        let letter = if c == esc {
            if let Some(end) = hex_sequence_end(b, i, esc) {
                // Pre-encoded hex/local sequence, keep it literal
                i = end + 1;
                continue;
            }
            'E'
        } else if c == fd {
            'F'
        } else if c == comp {
            'S'
        } else if c == sub {
            'T'
        } else if c == rep {
            'R'
        } else {
            i += 1;
            continue;
        };
        out.push_str(&input[lit..i]);
        out.push(seps.escape);
        out.push(letter);
        out.push(seps.escape);
        i += 1;
        lit = i;
    }
    out.push_str(&input[lit..]);
    Cow::Owned(out)
}

/// Reverse [`escape`].
///
/// Unknown or unterminated sequences are emitted literally; `\Xhh..\`
/// and `\Zhh..\` decode their hex pairs, `\.br\` decodes to CR.
pub fn unescape<'a>(input: &'a str, seps: &Separators) -> Cow<'a, str> {
    let esc = seps.escape as u8;
    let b = input.as_bytes();
    if memchr(esc, b).is_none() {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut i = 0usize;
    while i < b.len() {
        let Some(off) = memchr(esc, &b[i..]) else {
            out.push_str(&input[i..]);
            break;
        };
        let open = i + off;
        out.push_str(&input[i..open]);
        let Some(off2) = memchr(esc, &b[open + 1..]) else {
            // Unterminated sequence, keep the rest as-is
            out.push_str(&input[open..]);
            break;
        };
        let close = open + 1 + off2;
        if !decode_token(&mut out, &input[open + 1..close], seps) {
            out.push_str(&input[open..=close]);
        }
        i = close + 1;
    }
    Cow::Owned(out)
}

/// Decode one sequence body into `out`. Returns false when the body is
/// not a known sequence.
fn decode_token(out: &mut String, token: &str, seps: &Separators) -> bool {
    match token {
        "F" => out.push(seps.field),
        "S" => out.push(seps.component),
        "T" => out.push(seps.subcomponent),
        "R" => out.push(seps.repetition),
        "E" => out.push(seps.escape),
        ".br" => out.push(Separators::SEGMENT),
        _ => {
            let Some(hex) = token.strip_prefix(['X', 'Z']) else {
                return false;
            };
            return decode_hex_pairs(out, hex);
        }
    }
    true
}

/// Decode an even, non-empty run of hex digits into `out`, one byte
/// per pair.
fn decode_hex_pairs(out: &mut String, hex: &str) -> bool {
    let b = hex.as_bytes();
    if b.is_empty() || b.len() % 2 != 0 || !b.iter().all(u8::is_ascii_hexdigit) {
        return false;
    }
    for pair in hex.as_bytes().chunks_exact(2) {
        let hi = (pair[0] as char).to_digit(16).unwrap_or(0) as u8;
        let lo = (pair[1] as char).to_digit(16).unwrap_or(0) as u8;
        out.push(char::from(hi << 4 | lo));
    }
    true
}

/// If `b[i]` opens a `\Xhh..\` or `\Zhh..\` sequence, return the index
/// of its closing escape character.
fn hex_sequence_end(b: &[u8], i: usize, esc: u8) -> Option<usize> {
    match b.get(i + 1) {
        Some(b'X') | Some(b'Z') => {}
        _ => return None,
    }
    let mut j = i + 2;
    while j < b.len() && b[j].is_ascii_hexdigit() {
        j += 1;
    }
    if j > i + 2 && b.get(j) == Some(&esc) {
        Some(j)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seps() -> Separators {
        Separators::default()
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        let result = escape("patient name", &seps());
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "patient name");
    }

    #[test]
    fn test_escape_reserved() {
        assert_eq!(escape("a|b", &seps()), "a\\F\\b");
        assert_eq!(escape("a^b&c", &seps()), "a\\S\\b\\T\\c");
        assert_eq!(escape("a~b", &seps()), "a\\R\\b");
        assert_eq!(escape("a\\b", &seps()), "a\\E\\b");
    }

    #[test]
    fn test_hex_sequence_passes_through() {
        assert_eq!(escape("a\\X0D\\b", &seps()), "a\\X0D\\b");
        assert_eq!(escape("a\\Z41\\|", &seps()), "a\\Z41\\\\F\\");
    }

    #[test]
    fn test_unescape_letters() {
        assert_eq!(unescape("a\\F\\b\\S\\c", &seps()), "a|b^c");
        assert_eq!(unescape("\\R\\\\T\\\\E\\", &seps()), "~&\\");
    }

    #[test]
    fn test_unescape_break_and_hex() {
        assert_eq!(unescape("x\\.br\\y", &seps()), "x\ry");
        assert_eq!(unescape("\\X414243\\", &seps()), "ABC");
        assert_eq!(unescape("\\Z41\\", &seps()), "A");
    }

    #[test]
    fn test_unknown_sequence_is_literal() {
        assert_eq!(unescape("a\\Q\\b", &seps()), "a\\Q\\b");
        assert_eq!(unescape("a\\X4\\b", &seps()), "a\\X4\\b");
    }

    #[test]
    fn test_unterminated_is_literal() {
        assert_eq!(unescape("a\\Fb", &seps()), "a\\Fb");
    }

    #[test]
    fn test_round_trip() {
        let original = "ADT|A01^second~third&fourth\\fifth";
        let escaped = escape(original, &seps());
        assert_eq!(unescape(&escaped, &seps()), original);
    }
}
