//! Node-backed message.
//!
//! The owned node graph is the source of truth; the textual form is
//! re-joined on every read. A fresh builder is seeded with the
//! canonical empty header, and the separator set is an owned field:
//! delimiter writes update it and every subsequent join emits the new
//! characters.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use tracing::debug;

use crate::builder::cursor::{Cursor, CursorMut};
use crate::builder::node::Node;
use crate::core::escape as escape_impl;
use crate::core::separators::Separators;
use crate::core::{validate_message_text, validate_type_code};
use crate::details::MessageDetails;
use crate::element::{next_message_key, Detached, Element, Level, Path};
use crate::error::{Hl7Error, Result};

/// An HL7 message backed by an owned node graph.
pub struct MessageBuilder {
    separators: Separators,
    segments: BTreeMap<usize, Node>,
    key: Cell<Option<u64>>,
}

impl MessageBuilder {
    /// Empty message: the canonical `MSH|^~\&|` header and nothing
    /// else.
    pub fn new() -> MessageBuilder {
        let separators = Separators::default();
        let mut msh = Node::new(Level::Segment);
        msh.set_value(&separators.header(), &separators);
        let mut segments = BTreeMap::new();
        segments.insert(1, msh);
        MessageBuilder {
            separators,
            segments,
            key: Cell::new(None),
        }
    }

    /// Build the node graph from a raw message.
    pub fn parse(input: &str) -> Result<MessageBuilder> {
        let mut builder = MessageBuilder::new();
        builder.set_value(input)?;
        Ok(builder)
    }

    /// Re-join the whole message.
    pub fn value(&self) -> String {
        let max = self.value_count();
        let mut out = String::new();
        for i in 1..=max {
            if i > 1 {
                out.push(Separators::SEGMENT);
            }
            if let Some(node) = self.segments.get(&i) {
                out.push_str(&node.value(&self.separators));
            }
        }
        out
    }

    /// Rebuild the graph from a raw message, revalidating and
    /// re-deriving the separator set.
    pub fn set_value(&mut self, input: &str) -> Result<()> {
        let text = validate_message_text(input)?;
        let separators = Separators::from_header(&text)?;
        self.segments.clear();
        for (i, segment) in text.split(Separators::SEGMENT).enumerate() {
            let mut node = Node::new(Level::Segment);
            node.set_value(segment, &separators);
            self.segments.insert(i + 1, node);
        }
        self.separators = separators;
        debug!(segments = self.segments.len(), "built message graph");
        Ok(())
    }

    /// The owned separator set.
    pub fn separators(&self) -> &Separators {
        &self.separators
    }

    /// Opaque identity key, assigned on first observation.
    pub fn key(&self) -> u64 {
        match self.key.get() {
            Some(k) => k,
            None => {
                let k = next_message_key();
                self.key.set(Some(k));
                k
            }
        }
    }

    /// Structural sanity check, mirroring the parser side.
    pub fn is_valid(&self) -> bool {
        self.value().starts_with("MSH")
    }

    /// Escape reserved characters using this message's separators.
    pub fn escape(&self, value: &str) -> String {
        escape_impl::escape(value, &self.separators).into_owned()
    }

    /// Reverse [`MessageBuilder::escape`].
    pub fn unescape(&self, value: &str) -> String {
        escape_impl::unescape(value, &self.separators).into_owned()
    }

    /// Number of segments (highest key; holes count).
    pub fn value_count(&self) -> usize {
        self.segments.keys().next_back().copied().unwrap_or(0)
    }

    /// Segment cursor at a 1-based index.
    pub fn segment(&self, index: usize) -> Result<Cursor<'_>> {
        if index < 1 {
            return Err(Hl7Error::SegmentIndexMustBePositive);
        }
        Ok(Cursor::new(self, vec![index]))
    }

    /// Writable segment cursor at a 1-based index.
    pub fn segment_mut(&mut self, index: usize) -> Result<CursorMut<'_>> {
        if index < 1 {
            return Err(Hl7Error::SegmentIndexMustBePositive);
        }
        Ok(CursorMut::new(self, vec![index]))
    }

    /// All segments in document order.
    pub fn segments(&self) -> Vec<Cursor<'_>> {
        (1..=self.value_count())
            .map(|i| Cursor::new(self, vec![i]))
            .collect()
    }

    /// Segments with the given type code, in document order.
    pub fn segments_named(&self, code: &str) -> Vec<Cursor<'_>> {
        self.segments_in(&[code])
    }

    /// Segments whose type code is in `codes`, in document order.
    pub fn segments_in(&self, codes: &[&str]) -> Vec<Cursor<'_>> {
        self.segments()
            .into_iter()
            .filter(|seg| {
                let code = self.value_at(&[seg.index(), 0]).unwrap_or_default();
                codes.contains(&code.as_str())
            })
            .collect()
    }

    /// Cursor at an arbitrary path.
    pub fn element(&self, path: Path) -> Cursor<'_> {
        Cursor::new(self, path.steps())
    }

    /// Writable cursor at an arbitrary path.
    pub fn element_mut(&mut self, path: Path) -> CursorMut<'_> {
        CursorMut::new(self, path.steps())
    }

    /// Value at a path; None when the position is absent.
    pub fn get_value(&self, path: Path) -> Option<String> {
        self.value_at(&path.steps())
    }

    /// Direct children's values of the element at a path.
    pub fn get_values(&self, path: Path) -> Vec<String> {
        self.values_at(&path.steps())
    }

    /// Header snapshot from MSH-3..MSH-12.
    pub fn details(&self) -> MessageDetails {
        MessageDetails::from_lookup(|field| self.value_at(&[1, field]))
    }

    // === Fluent setters ===

    /// Set consecutive fields of a segment starting at index 0 (the
    /// type code).
    pub fn set_fields(&mut self, segment: usize, values: &[&str]) -> Result<&mut Self> {
        for (i, v) in values.iter().enumerate() {
            self.set_at(&[segment, i], Some(v))?;
        }
        Ok(self)
    }

    /// Set one field.
    pub fn set_field(&mut self, segment: usize, field: usize, value: &str) -> Result<&mut Self> {
        self.set_at(&[segment, field], Some(value))?;
        Ok(self)
    }

    /// Set one repetition of a field.
    pub fn set_repetition(
        &mut self,
        segment: usize,
        field: usize,
        repetition: usize,
        value: &str,
    ) -> Result<&mut Self> {
        self.set_at(&[segment, field, repetition], Some(value))?;
        Ok(self)
    }

    /// Set one component of a field's first repetition.
    pub fn set_component(
        &mut self,
        segment: usize,
        field: usize,
        component: usize,
        value: &str,
    ) -> Result<&mut Self> {
        self.set_at(&[segment, field, 1, component], Some(value))?;
        Ok(self)
    }

    /// Set one subcomponent of a field's first repetition.
    pub fn set_subcomponent(
        &mut self,
        segment: usize,
        field: usize,
        component: usize,
        subcomponent: usize,
        value: &str,
    ) -> Result<&mut Self> {
        self.set_at(&[segment, field, 1, component, subcomponent], Some(value))?;
        Ok(self)
    }

    /// Append a segment at the end of the message.
    pub fn add_segment(&mut self, value: &str) -> Result<&mut Self> {
        let next = self.value_count() + 1;
        self.set_at(&[next], Some(value))?;
        Ok(self)
    }

    /// Insert a segment at `index`, shifting later segments up.
    pub fn insert_segment(&mut self, index: usize, value: &str) -> Result<()> {
        self.insert_at(&[], index, value)
    }

    /// Delete the segment at `index`, shifting later segments down.
    pub fn delete_segment(&mut self, index: usize) -> Result<()> {
        self.delete_at(&[index])
    }

    /// Move the segment at `index` to `target`.
    pub fn move_segment(&mut self, index: usize, target: usize) -> Result<()> {
        self.move_at(&[index], target)
    }

    /// Append detached segments in order. Items from absent positions
    /// are skipped.
    pub fn add_range<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = Detached>,
    {
        for item in items {
            if let Some(value) = item.value() {
                self.add_segment(value)?;
            }
        }
        Ok(())
    }

    // === Graph walking ===

    fn node(&self, steps: &[usize]) -> Option<&Node> {
        let (first, rest) = steps.split_first()?;
        let mut node = self.segments.get(first)?;
        for &i in rest {
            node = node.child(i)?;
        }
        Some(node)
    }

    fn node_mut(&mut self, steps: &[usize]) -> Option<&mut Node> {
        let (first, rest) = steps.split_first()?;
        let mut node = self.segments.get_mut(first)?;
        for &i in rest {
            node = node.child_mut(i)?;
        }
        Some(node)
    }

    /// Segment node at `index`, created (with an empty type code) if
    /// missing.
    fn ensure_segment(&mut self, index: usize) -> &mut Node {
        self.segments.entry(index).or_insert_with(|| {
            let mut node = Node::new(Level::Segment);
            node.put_raw_child(0, "");
            node
        })
    }

    fn ensure_node(&mut self, steps: &[usize]) -> &mut Node {
        let mut node = self.ensure_segment(steps[0]);
        for &i in &steps[1..] {
            node = node.ensure_child(i);
        }
        node
    }

    fn is_msh_at(&self, segment: usize) -> bool {
        self.segments
            .get(&segment)
            .map(|n| n.is_msh(&self.separators))
            .unwrap_or(false)
    }

    /// Addresses field 1 or 2 of an MSH-typed segment?
    fn msh_fixed_field(&self, steps: &[usize]) -> Option<usize> {
        if steps.len() >= 2 && (steps[1] == 1 || steps[1] == 2) && self.is_msh_at(steps[0]) {
            return Some(steps[1]);
        }
        None
    }

    /// Value of the element at `steps`; None when absent. Holes
    /// inside the counted range read as present-but-empty.
    pub(crate) fn value_at(&self, steps: &[usize]) -> Option<String> {
        if steps.is_empty() {
            return Some(self.value());
        }
        if steps.len() > 5 {
            return None;
        }
        let mut node: Option<&Node> = None;
        for (depth, &index) in steps.iter().enumerate() {
            let (next, count) = match node {
                None => (self.segments.get(&index), self.value_count()),
                Some(n) => (n.child(index), n.count()),
            };
            match next {
                Some(n) => node = Some(n),
                None => {
                    let within = index >= 1 && index <= count;
                    return if within && depth == steps.len() - 1 {
                        Some(String::new())
                    } else {
                        None
                    };
                }
            }
        }
        node.map(|n| n.value(&self.separators))
    }

    /// Number of direct children of the element at `steps`.
    pub(crate) fn count_at(&self, steps: &[usize]) -> usize {
        if steps.is_empty() {
            return self.value_count();
        }
        if steps.len() > 5 {
            return 0;
        }
        if steps.len() == 2 && (steps[1] == 0 || self.msh_fixed_field(steps).is_some()) {
            return 0;
        }
        self.node(steps).map(|n| n.count()).unwrap_or(0)
    }

    /// Values of the direct children of the element at `steps`.
    pub(crate) fn values_at(&self, steps: &[usize]) -> Vec<String> {
        let count = self.count_at(steps);
        let mut child = steps.to_vec();
        child.push(0);
        let mut out = Vec::with_capacity(count);
        for i in 1..=count {
            if let Some(last) = child.last_mut() {
                *last = i;
            }
            out.push(self.value_at(&child).unwrap_or_default());
        }
        out
    }

    /// Child separator of the element at `steps`, NUL at leaves.
    pub(crate) fn delimiter_at(&self, steps: &[usize]) -> char {
        if steps.len() >= 5 {
            return '\0';
        }
        if steps.len() >= 2 && (steps[1] == 0 || self.msh_fixed_field(steps).is_some()) {
            return '\0';
        }
        Level::at_depth(steps.len()).delimiter(&self.separators)
    }

    // === Mutation ===

    /// Writes deeper than a leaf or into the fixed MSH region are
    /// structural violations.
    fn guard_fixed(&self, steps: &[usize]) -> Result<()> {
        if steps.len() > 5 {
            return Err(Hl7Error::FixedFieldViolation);
        }
        if steps.len() >= 3 && (steps[1] == 0 || self.msh_fixed_field(&steps[..2]).is_some()) {
            return Err(Hl7Error::FixedFieldViolation);
        }
        Ok(())
    }

    /// Set or delete the value at `steps`.
    pub(crate) fn set_at(&mut self, steps: &[usize], value: Option<&str>) -> Result<()> {
        if steps.is_empty() {
            return match value {
                Some(v) => self.set_value(v),
                None => Err(Hl7Error::DeleteForbidden),
            };
        }
        self.guard_fixed(steps)?;
        match value {
            Some(v) => self.write_at(steps, v),
            None => self.delete_at(steps),
        }
    }

    fn write_at(&mut self, steps: &[usize], value: &str) -> Result<()> {
        if steps.len() == 2 {
            if let Some(fixed) = self.msh_fixed_field(steps) {
                if steps[0] != 1 {
                    return Err(Hl7Error::FixedFieldViolation);
                }
                return if fixed == 1 {
                    self.set_field_delimiter(value)
                } else {
                    self.set_encoding_characters(value)
                };
            }
            if steps[1] == 0 {
                validate_type_code(value)?;
                if steps[0] == 1 && value != "MSH" {
                    return Err(Hl7Error::FixedFieldViolation);
                }
                self.ensure_segment(steps[0]).put_raw_child(0, value);
                return Ok(());
            }
        }
        if steps.len() == 1 && steps[0] == 1 {
            // rewriting the whole header re-derives the separators
            if value.len() < 8 {
                return Err(Hl7Error::MessageTooShort(value.len()));
            }
            if !value.starts_with("MSH") {
                return Err(Hl7Error::MissingHeader);
            }
            let separators = Separators::from_header(value)?;
            self.ensure_segment(1).set_value(value, &separators);
            self.separators = separators;
            debug!("rewrote message header");
            return Ok(());
        }
        let separators = self.separators;
        self.ensure_node(steps).set_value(value, &separators);
        Ok(())
    }

    /// Delete the element at `steps`, shifting later siblings down.
    pub(crate) fn delete_at(&mut self, steps: &[usize]) -> Result<()> {
        if steps.is_empty() {
            return Err(Hl7Error::DeleteForbidden);
        }
        if steps.len() == 1 && steps[0] == 1 {
            return Err(Hl7Error::DeleteForbidden);
        }
        if steps.len() == 2 && (steps[1] == 0 || self.msh_fixed_field(steps).is_some()) {
            return Err(Hl7Error::FixedFieldViolation);
        }
        self.guard_fixed(steps)?;

        let index = steps[steps.len() - 1];
        if steps.len() == 1 {
            if index > self.value_count() {
                return Ok(());
            }
            self.segments.remove(&index);
            let keys: Vec<usize> = self.segments.range(index + 1..).map(|(&k, _)| k).collect();
            for k in keys {
                if let Some(node) = self.segments.remove(&k) {
                    self.segments.insert(k - 1, node);
                }
            }
            return Ok(());
        }
        let Some(parent) = self.node_mut(&steps[..steps.len() - 1]) else {
            return Ok(());
        };
        if index > parent.count() {
            return Ok(());
        }
        parent.remove_child(index);
        Ok(())
    }

    /// Insert `value` as a child of `parent_steps` at `index`,
    /// shifting `index..` up by one.
    pub(crate) fn insert_at(
        &mut self,
        parent_steps: &[usize],
        index: usize,
        value: &str,
    ) -> Result<()> {
        if index < 1 {
            return Err(Hl7Error::IndexBelowMinimum(index));
        }
        if parent_steps.len() >= 5 {
            return Err(Hl7Error::FixedFieldViolation);
        }
        if parent_steps.len() >= 2
            && (parent_steps[1] == 0 || self.msh_fixed_field(parent_steps).is_some())
        {
            return Err(Hl7Error::FixedFieldViolation);
        }
        if parent_steps.is_empty() && index == 1 {
            // would displace the MSH segment
            return Err(Hl7Error::FixedFieldViolation);
        }
        if parent_steps.len() == 1 && index <= 2 && self.is_msh_at(parent_steps[0]) {
            return Err(Hl7Error::FixedFieldViolation);
        }

        let count = self.count_at(parent_steps);
        let mut child_steps = parent_steps.to_vec();
        child_steps.push(index);
        if index <= count {
            if parent_steps.is_empty() {
                let keys: Vec<usize> = self.segments.range(index..).map(|(&k, _)| k).collect();
                for &k in keys.iter().rev() {
                    if let Some(node) = self.segments.remove(&k) {
                        self.segments.insert(k + 1, node);
                    }
                }
            } else if let Some(parent) = self.node_mut(parent_steps) {
                parent.shift_up(index);
            }
        }
        self.write_at(&child_steps, value)
    }

    /// Move the element at `steps` to `target` among its siblings.
    pub(crate) fn move_at(&mut self, steps: &[usize], target: usize) -> Result<()> {
        if steps.is_empty() {
            return Err(Hl7Error::MoveForbidden);
        }
        let index = steps[steps.len() - 1];
        if target == index {
            return Ok(());
        }
        if steps.len() == 1 && steps[0] == 1 {
            return Err(Hl7Error::MoveForbidden);
        }
        if steps.len() == 2 && (steps[1] == 0 || self.msh_fixed_field(steps).is_some()) {
            return Err(Hl7Error::MoveForbidden);
        }
        self.guard_fixed(steps)?;
        if target < 1 {
            return Err(Hl7Error::IndexBelowMinimum(target));
        }
        if steps.len() == 1 && target == 1 {
            return Err(Hl7Error::FixedFieldViolation);
        }
        if steps.len() == 2 && target <= 2 && self.is_msh_at(steps[0]) {
            return Err(Hl7Error::FixedFieldViolation);
        }

        let parent_count = self.count_at(&steps[..steps.len() - 1]);
        if index > parent_count {
            return Ok(());
        }
        let value = self.value_at(steps).unwrap_or_default();
        self.delete_at(steps)?;
        self.insert_at(&steps[..steps.len() - 1], target, &value)
    }

    // === MSH-1 / MSH-2 rewrite paths ===

    /// Adopt a new field delimiter; every join emits it from here on.
    fn set_field_delimiter(&mut self, value: &str) -> Result<()> {
        let mut chars = value.chars();
        let (Some(new_fd), None) = (chars.next(), chars.next()) else {
            return Err(Hl7Error::FixedFieldViolation);
        };
        let old = self.separators;
        if new_fd == old.field {
            return Ok(());
        }
        self.separators = Separators::new(
            new_fd,
            old.component,
            old.repetition,
            old.escape,
            old.subcomponent,
        )?;
        if let Some(msh) = self.segments.get_mut(&1) {
            msh.put_raw_child(1, &new_fd.to_string());
        }
        debug!(from = %old.field, to = %new_fd, "rewrote field delimiter");
        Ok(())
    }

    /// Adopt new encoding characters.
    fn set_encoding_characters(&mut self, value: &str) -> Result<()> {
        let chars: Vec<char> = value.chars().collect();
        let [comp, rep, esc, sub] = chars[..] else {
            return Err(Hl7Error::FixedFieldViolation);
        };
        let old = self.separators;
        self.separators = Separators::new(old.field, comp, rep, esc, sub)?;
        if let Some(msh) = self.segments.get_mut(&1) {
            msh.put_raw_child(2, value);
        }
        debug!(encoding = %value, "rewrote encoding characters");
        Ok(())
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        MessageBuilder::new()
    }
}

impl FromStr for MessageBuilder {
    type Err = Hl7Error;

    fn from_str(s: &str) -> Result<MessageBuilder> {
        MessageBuilder::parse(s)
    }
}

impl Element for MessageBuilder {
    fn level(&self) -> Level {
        Level::Message
    }

    fn index(&self) -> usize {
        1
    }

    fn delimiter(&self) -> char {
        Separators::SEGMENT
    }

    fn value(&self) -> Option<String> {
        Some(MessageBuilder::value(self))
    }

    fn value_count(&self) -> usize {
        MessageBuilder::value_count(self)
    }

    fn values(&self) -> Vec<String> {
        self.values_at(&[])
    }
}

impl Clone for MessageBuilder {
    fn clone(&self) -> MessageBuilder {
        MessageBuilder {
            separators: self.separators,
            segments: self.segments.clone(),
            key: Cell::new(None),
        }
    }
}

impl PartialEq for MessageBuilder {
    fn eq(&self, other: &MessageBuilder) -> bool {
        self.value() == other.value()
    }
}

impl Eq for MessageBuilder {}

impl Hash for MessageBuilder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value().hash(state);
    }
}

impl fmt::Display for MessageBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}

impl fmt::Debug for MessageBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBuilder")
            .field("value", &self.value())
            .field("separators", &self.separators)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "MSH|^~\\&|APP|FAC|DEST|DFAC|20260101||ADT^A01|42|P|2.5\rPID|1||A^B&C~D";

    #[test]
    fn test_new_is_canonical_header() {
        let b = MessageBuilder::new();
        assert_eq!(b.value(), "MSH|^~\\&|");
        assert_eq!(b.value_count(), 1);
    }

    #[test]
    fn test_parse_round_trip() {
        let b = MessageBuilder::parse(SAMPLE).unwrap();
        assert_eq!(b.value(), SAMPLE);
        assert_eq!(b.value_count(), 2);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            MessageBuilder::parse(""),
            Err(Hl7Error::EmptyMessage)
        ));
        assert!(matches!(
            MessageBuilder::parse("X"),
            Err(Hl7Error::MessageTooShort(1))
        ));
        assert!(matches!(
            MessageBuilder::parse("ABCDEFGHIJ"),
            Err(Hl7Error::MissingHeader)
        ));
    }

    #[test]
    fn test_reads_mirror_parser() {
        let b = MessageBuilder::parse(SAMPLE).unwrap();
        assert_eq!(b.value_at(&[1, 0]), Some("MSH".into()));
        assert_eq!(b.value_at(&[1, 1]), Some("|".into()));
        assert_eq!(b.value_at(&[1, 2]), Some("^~\\&".into()));
        assert_eq!(b.value_at(&[1, 3]), Some("APP".into()));
        assert_eq!(b.value_at(&[2, 3]), Some("A^B&C~D".into()));
        assert_eq!(b.value_at(&[2, 3, 1, 2, 1]), Some("B".into()));
        assert_eq!(b.value_at(&[2, 3, 2]), Some("D".into()));
        assert_eq!(b.value_at(&[2, 4]), None);
        assert_eq!(b.count_at(&[1]), 12);
        assert_eq!(b.count_at(&[2]), 3);
        assert_eq!(b.count_at(&[2, 3]), 2);
        assert_eq!(b.count_at(&[1, 1]), 0);
        assert_eq!(b.count_at(&[2, 0]), 0);
    }

    #[test]
    fn test_set_fields_builds_header() {
        let mut b = MessageBuilder::new();
        b.set_fields(1, &["MSH", "|", "^~\\&"]).unwrap();
        assert_eq!(b.value(), "MSH|^~\\&|");
    }

    #[test]
    fn test_fluent_setters() {
        let mut b = MessageBuilder::new();
        b.set_fields(2, &["PID", "1"])
            .unwrap()
            .set_component(2, 3, 2, "deep")
            .unwrap()
            .set_subcomponent(2, 4, 1, 2, "s")
            .unwrap();
        assert_eq!(b.value(), "MSH|^~\\&|\rPID|1|^deep|&s");
        assert_eq!(b.value_at(&[2, 3, 1, 2]), Some("deep".into()));
        assert_eq!(b.value_at(&[2, 4, 1, 1, 2]), Some("s".into()));
    }

    #[test]
    fn test_write_extends_absent_chain() {
        let mut b = MessageBuilder::parse("MSH|^~\\&|\rPID|x").unwrap();
        b.set_at(&[2, 2, 2, 3], Some("deep")).unwrap();
        assert_eq!(b.value(), "MSH|^~\\&|\rPID|x|~^^deep");
    }

    #[test]
    fn test_delete_shifts_down() {
        let mut b = MessageBuilder::parse("MSH|^~\\&|\rPID|a|b|c").unwrap();
        b.set_at(&[2, 2], None).unwrap();
        assert_eq!(b.value(), "MSH|^~\\&|\rPID|a|c");
        b.delete_at(&[2, 2]).unwrap();
        assert_eq!(b.value(), "MSH|^~\\&|\rPID|a");
    }

    #[test]
    fn test_insert_shifts_up() {
        let mut b = MessageBuilder::parse("MSH|^~\\&|\rPID|a|b").unwrap();
        b.insert_at(&[2], 1, "x").unwrap();
        assert_eq!(b.value(), "MSH|^~\\&|\rPID|x|a|b");
        b.insert_at(&[], 2, "OBX|1").unwrap();
        assert_eq!(b.value(), "MSH|^~\\&|\rOBX|1\rPID|x|a|b");
    }

    #[test]
    fn test_move_segment() {
        let mut b = MessageBuilder::parse("MSH|^~\\&|\rAAA|1\rBBB|2").unwrap();
        b.move_at(&[2], 3).unwrap();
        assert_eq!(b.value(), "MSH|^~\\&|\rBBB|2\rAAA|1");
    }

    #[test]
    fn test_protections() {
        let mut b = MessageBuilder::parse(SAMPLE).unwrap();
        assert_eq!(b.delete_at(&[1]), Err(Hl7Error::DeleteForbidden));
        assert_eq!(b.delete_at(&[1, 2]), Err(Hl7Error::FixedFieldViolation));
        assert_eq!(b.delete_at(&[2, 0]), Err(Hl7Error::FixedFieldViolation));
        assert_eq!(b.move_at(&[1, 2], 1), Err(Hl7Error::MoveForbidden));
        assert_eq!(b.move_at(&[2], 1), Err(Hl7Error::FixedFieldViolation));
        assert_eq!(b.move_at(&[2, 3], 0), Err(Hl7Error::IndexBelowMinimum(0)));
        assert_eq!(
            b.set_at(&[1, 2, 1], Some("x")),
            Err(Hl7Error::FixedFieldViolation)
        );
        let before = b.value();
        assert_eq!(b.value(), before);
    }

    #[test]
    fn test_delimiter_rewrites_reemit() {
        let mut b = MessageBuilder::parse("MSH|^~\\&|ap\rPID|1|a^b").unwrap();
        b.set_at(&[1, 1], Some("#")).unwrap();
        assert_eq!(b.value(), "MSH#^~\\&#ap\rPID#1#a^b");
        b.set_at(&[1, 2], Some("*~\\&")).unwrap();
        assert_eq!(b.value(), "MSH#*~\\&#ap\rPID#1#a*b");
        assert_eq!(b.value_at(&[1, 1]), Some("#".into()));
        assert_eq!(b.value_at(&[1, 2]), Some("*~\\&".into()));
        assert_eq!(
            b.set_at(&[1, 1], Some("*")),
            Err(Hl7Error::SeparatorsNotDistinct)
        );
    }

    #[test]
    fn test_type_code_rules() {
        let mut b = MessageBuilder::parse(SAMPLE).unwrap();
        b.set_at(&[2, 0], Some("NK1")).unwrap();
        assert_eq!(b.segments_named("NK1").len(), 1);
        assert_eq!(
            b.set_at(&[2, 0], Some("pid")),
            Err(Hl7Error::FixedFieldViolation)
        );
        assert_eq!(
            b.set_at(&[1, 0], Some("PID")),
            Err(Hl7Error::FixedFieldViolation)
        );
    }

    #[test]
    fn test_holes_read_as_empty_within_count() {
        let mut b = MessageBuilder::parse("MSH|^~\\&|\rPID|a").unwrap();
        b.set_at(&[2, 5], Some("e")).unwrap();
        assert_eq!(b.value(), "MSH|^~\\&|\rPID|a||||e");
        assert_eq!(b.value_at(&[2, 3]), Some("".into()));
        assert_eq!(b.value_at(&[2, 6]), None);
        // deleting a hole still shifts the tail down
        b.delete_at(&[2, 3]).unwrap();
        assert_eq!(b.value(), "MSH|^~\\&|\rPID|a|||e");
    }

    #[test]
    fn test_identity_and_equality() {
        let a = MessageBuilder::parse(SAMPLE).unwrap();
        let b = MessageBuilder::parse(SAMPLE).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.key(), b.key());
        let c = a.clone();
        assert_eq!(a, c);
        assert_ne!(a.key(), c.key());
    }
}
