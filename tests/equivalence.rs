//! The two representations must be observationally interchangeable:
//! every read path answers the same over a parsed message and a built
//! one, and the universal invariants hold across arbitrary inputs.

use hl7msg::{
    escape, sanitize, unescape, Element, ElementMut, Message, MessageBuilder,
    Path, Separators,
};
use proptest::prelude::*;

const STANDARD: &str = "MSH|^~\\&|SENDAPP|SENDFAC|RECVAPP|RECVFAC|20260401123000||ADT^A01|MSG00001|P|2.5\rEVN|A01|20260401\rPID|1||12345^^^MRN||DOE^JOHN||19800101|M\rNK1|1|DOE^JANE|SPO\rPV1|1|I|ICU^1^1";

/// Index grid covering every level, including one position beyond
/// whatever exists.
fn path_grid(segments: usize) -> Vec<Path> {
    let mut paths = Vec::new();
    for s in 1..=segments + 1 {
        paths.push(Path::segment(s));
        for f in 0..=5 {
            paths.push(Path::segment(s).field(f));
            for r in 1..=2 {
                paths.push(Path::segment(s).field(f).repetition(r));
                for c in 1..=2 {
                    paths.push(Path::segment(s).field(f).repetition(r).component(c));
                    for u in 1..=2 {
                        paths.push(
                            Path::segment(s)
                                .field(f)
                                .repetition(r)
                                .component(c)
                                .subcomponent(u),
                        );
                    }
                }
            }
        }
    }
    paths
}

fn assert_equivalent(raw: &str) {
    let parsed = Message::parse(raw).expect("parser ingest");
    let built = MessageBuilder::parse(raw).expect("builder ingest");
    assert_eq!(parsed.value(), built.value(), "emission differs");
    assert_eq!(parsed.value_count(), built.value_count());
    for path in path_grid(parsed.value_count()) {
        assert_eq!(
            parsed.get_value(path),
            built.get_value(path),
            "value diverges at {:?} in {:?}",
            path,
            raw
        );
        assert_eq!(
            parsed.element(path).value_count(),
            built.element(path).value_count(),
            "count diverges at {:?} in {:?}",
            path,
            raw
        );
        assert_eq!(
            parsed.element(path).delimiter(),
            built.element(path).delimiter(),
            "delimiter diverges at {:?}",
            path
        );
    }
}

#[test]
fn standard_message_is_equivalent_across_representations() {
    assert_equivalent(STANDARD);
}

#[test]
fn edge_shapes_are_equivalent() {
    for raw in [
        "MSH|^~\\&|",
        "MSH|^~\\&|a",
        "MSH|^~\\&||",
        "MSH|^~\\&|~^&",
        "MSH|^~\\&|\rPID",
        "MSH|^~\\&|\rPID|",
        "MSH|^~\\&|\rPID|1||A^B&C~D",
        "MSH|^~\\&|\rTST|a~|^b&",
        "MSH|^~\\&|x\rAAA|1\rAAA|2\rBBB|3",
        "MSH|^~\\&",
        // a stray MSH-typed segment is addressed like the header but
        // does not own the delimiters
        "MSH|^~\\&|x\rMSH|a^b",
        "MSH|^~\\&|x\rMSH",
    ] {
        assert_equivalent(raw);
    }
}

#[test]
fn mutation_parity_on_shared_operations() {
    let raw = "MSH|^~\\&|\rPID|a|b^c|d";
    let mut m = Message::parse(raw).unwrap();
    let mut b = MessageBuilder::parse(raw).unwrap();

    for (steps_desc, value) in [
        (Path::segment(2).field(2).repetition(1).component(3), Some("z")),
        (Path::segment(2).field(5), Some("tail")),
        (Path::segment(2).field(1), None),
        (Path::segment(3).field(2), Some("new")),
    ] {
        m.element_mut(steps_desc).set_value(value).unwrap();
        b.element_mut(steps_desc).set_value(value).unwrap();
        assert_eq!(m.value(), b.value(), "after write {:?}", steps_desc);
    }
    assert_equivalent(&m.value().to_string());
}

#[test]
fn clone_is_independent_immediately_and_after_mutation() {
    let original = Message::parse(STANDARD).unwrap();
    let mut copy = original.clone();
    assert_eq!(Element::value(&original), Element::value(&copy));
    copy.element_mut(Path::segment(2).field(1)).set("XX").unwrap();
    assert_eq!(original.value(), STANDARD);
    assert_ne!(original.value(), copy.value());

    let built = MessageBuilder::parse(STANDARD).unwrap();
    let mut copy = built.clone();
    copy.element_mut(Path::segment(2).field(1)).set("XX").unwrap();
    assert_eq!(built.value(), STANDARD);
    assert_ne!(built.value(), copy.value());
}

proptest! {
    /// Parsing never alters sanitized text.
    #[test]
    fn prop_round_trip_identity(raw in arb_message()) {
        let m = Message::parse(&raw).unwrap();
        prop_assert_eq!(m.value(), sanitize(&raw));
    }

    /// Every indexing path answers identically in both
    /// representations.
    #[test]
    fn prop_representation_equivalence(raw in arb_message()) {
        let parsed = Message::parse(&raw).unwrap();
        let built = MessageBuilder::parse(&raw).unwrap();
        prop_assert_eq!(parsed.value(), built.value());
        for path in path_grid(parsed.value_count()) {
            prop_assert_eq!(
                parsed.get_value(path),
                built.get_value(path),
                "at {:?} in {:?}", path, raw
            );
        }
    }

    /// Insert then delete at the same index restores the parent.
    #[test]
    fn prop_insert_delete_inverse(raw in arb_message(), index in 0usize..5, value in "[A-Za-z0-9]{0,6}") {
        let mut m = Message::parse(&raw).unwrap();
        let segment = m.value_count();
        let count = m.segment(segment).unwrap().value_count();
        // stay within one past the end, and clear of the MSH fixed
        // fields when only the header exists
        let mut at = 1 + index % (count + 1);
        if segment == 1 {
            at = at.max(3);
        }
        let before = m.value().to_string();
        {
            let mut seg = m.segment_mut(segment).unwrap();
            seg.insert(at, &value).unwrap();
            seg.delete(at).unwrap();
        }
        prop_assert_eq!(m.value(), before);
    }

    /// Moving an element onto its own index changes nothing.
    #[test]
    fn prop_move_idempotence(raw in arb_message(), field in 1usize..4) {
        let mut m = Message::parse(&raw).unwrap();
        let segment = m.value_count();
        let before = m.value().to_string();
        m.element_mut(Path::segment(segment).field(field))
            .move_to(field)
            .unwrap();
        prop_assert_eq!(m.value(), before);
    }

    /// The separators derived from the emitted header always match
    /// the live snapshot.
    #[test]
    fn prop_delimiter_recovery(raw in arb_message(), value in "[A-Za-z0-9]{0,6}") {
        let mut m = Message::parse(&raw).unwrap();
        m.element_mut(Path::segment(2).field(3)).set(&value).unwrap();
        let derived = Separators::from_header(m.value()).unwrap();
        prop_assert_eq!(&derived, m.separators());
    }

    /// Unescape inverts escape for any text free of the escape
    /// character.
    #[test]
    fn prop_escape_round_trip(s in "[A-Za-z0-9|^~& .]{0,24}") {
        let seps = Separators::default();
        let escaped = escape(&s, &seps);
        // nothing reserved may survive escaping
        prop_assert!(!escaped.contains('|') && !escaped.contains('~')
            && !escaped.contains('^') && !escaped.contains('&'));
        let unescaped = unescape(&escaped, &seps);
        prop_assert_eq!(unescaped.as_ref(), s.as_str());
    }
}

/// Messages assembled from a small alphabet: a realistic MSH prefix
/// plus up to three segments of nested delimited values.
fn arb_message() -> impl Strategy<Value = String> {
    let token = "[A-Za-z0-9]{0,5}";
    let component =
        prop::collection::vec(token, 1..3).prop_map(|subs| subs.join("&"));
    let repetition =
        prop::collection::vec(component, 1..3).prop_map(|comps| comps.join("^"));
    let field =
        prop::collection::vec(repetition, 1..3).prop_map(|reps| reps.join("~"));
    let segment = ("[A-Z]{2}[A-Z0-9]", prop::collection::vec(field, 0..4)).prop_map(
        |(code, fields)| {
            if fields.is_empty() {
                code
            } else {
                format!("{}|{}", code, fields.join("|"))
            }
        },
    );
    prop::collection::vec(segment, 0..3).prop_map(|segments| {
        let mut message = String::from("MSH|^~\\&|SND|RCV");
        for segment in segments {
            message.push('\r');
            message.push_str(&segment);
        }
        message
    })
}
