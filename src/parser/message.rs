//! String-backed message.
//!
//! The source text is the single source of truth. Elements are
//! resolved on demand as spans by walking delimiter pieces inside
//! their parent's slice; resolved spans go through a bounded LRU cache
//! keyed by index path. Writes splice the backing string in place and
//! drop the cache wholesale.
//!
//! Reads populate the cache through interior mutability, so a message
//! is intentionally not `Sync`; independent messages may be used from
//! different threads freely.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use lru::LruCache;
use memchr::memchr_iter;
use tracing::{debug, trace};

use crate::core::escape as escape_impl;
use crate::core::separators::Separators;
use crate::core::{validate_message_text, validate_type_code};
use crate::details::MessageDetails;
use crate::element::{next_message_key, Detached, Element, Level, Path};
use crate::error::{Hl7Error, Result};
use crate::parser::cursor::{Cursor, CursorMut};
use crate::parser::span::Span;

/// Resolved spans kept per message. Spans are tiny; the cap only
/// bounds pathological fan-out.
const SPAN_CACHE_CAPACITY: usize = 512;

/// Index path into the tree, at most five steps deep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PathKey {
    steps: [u32; 5],
    depth: u8,
}

impl PathKey {
    fn from_steps(steps: &[usize]) -> PathKey {
        let mut arr = [0u32; 5];
        for (slot, &step) in arr.iter_mut().zip(steps) {
            *slot = step as u32;
        }
        PathKey {
            steps: arr,
            depth: steps.len() as u8,
        }
    }
}

fn new_cache() -> RefCell<LruCache<PathKey, Span>> {
    let cap = NonZeroUsize::new(SPAN_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
    RefCell::new(LruCache::new(cap))
}

/// Where a write lands: on an existing slice, or appended to the
/// deepest present ancestor.
enum Location {
    Present(Span),
    Absent { parent: Span, missing_from: usize },
}

/// An HL7 message backed by its source string.
pub struct Message {
    text: String,
    separators: Separators,
    cache: RefCell<LruCache<PathKey, Span>>,
    key: Cell<Option<u64>>,
}

impl Message {
    /// Parse a raw message.
    ///
    /// Line endings are normalized to CR and the separator set is
    /// derived from the header before anything is indexed.
    pub fn parse(input: &str) -> Result<Message> {
        let text = validate_message_text(input)?;
        let separators = Separators::from_header(&text)?;
        let message = Message {
            text,
            separators,
            cache: new_cache(),
            key: Cell::new(None),
        };
        debug!(
            bytes = message.text.len(),
            segments = message.value_count(),
            "parsed message"
        );
        Ok(message)
    }

    /// The whole message text.
    pub fn value(&self) -> &str {
        &self.text
    }

    /// Replace the whole message, revalidating and re-deriving the
    /// separator set.
    pub fn set_value(&mut self, input: &str) -> Result<()> {
        let text = validate_message_text(input)?;
        let separators = Separators::from_header(&text)?;
        self.text = text;
        self.separators = separators;
        self.invalidate();
        Ok(())
    }

    /// The separator set currently declared by MSH-1/MSH-2.
    pub fn separators(&self) -> &Separators {
        &self.separators
    }

    /// Opaque identity key, assigned on first observation and stable
    /// for the lifetime of this message.
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

    /// Structural sanity check: non-empty and MSH-prefixed. Never
    /// fails with an error.
    pub fn is_valid(&self) -> bool {
        !self.text.is_empty() && self.text.starts_with("MSH")
    }

    /// Escape reserved characters using this message's separators.
    pub fn escape(&self, value: &str) -> String {
        escape_impl::escape(value, &self.separators).into_owned()
    }

    /// Reverse [`Message::escape`].
    pub fn unescape(&self, value: &str) -> String {
        escape_impl::unescape(value, &self.separators).into_owned()
    }

    /// Number of segments.
    pub fn value_count(&self) -> usize {
        self.count_at(&[])
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

    /// Append a segment at the end of the message.
    pub fn add_segment(&mut self, value: &str) -> Result<()> {
        let next = self.value_count() + 1;
        self.set_at(&[next], Some(value))
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

    /// Append detached segments in order. Items detached from other
    /// levels or from absent positions are skipped.
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

    // === Span resolution ===

    fn root_span(&self) -> Span {
        Span::new(0, self.text.len() as u32)
    }

    /// True when the segment slice carries the MSH type code.
    fn is_msh_segment(&self, seg: Span) -> bool {
        let s = seg.slice(&self.text);
        s.starts_with("MSH")
            && (s.len() == 3 || s.as_bytes()[3] == self.separators.field as u8)
    }

    /// Addresses field 1 or 2 of an MSH-typed segment?
    fn msh_fixed_field(&self, steps: &[usize]) -> Option<usize> {
        if steps.len() >= 2 && (steps[1] == 1 || steps[1] == 2) {
            if let Some(seg) = self.resolve(&steps[..1]) {
                if self.is_msh_segment(seg) {
                    return Some(steps[1]);
                }
            }
        }
        None
    }

    /// 0-based piece `n` of `span` split on `delim`.
    fn piece(&self, span: Span, delim: char, n: usize) -> Option<Span> {
        let bytes = &self.text.as_bytes()[span.range()];
        let mut start = 0usize;
        let mut idx = 0usize;
        for pos in memchr_iter(delim as u8, bytes) {
            if idx == n {
                return Some(Span::new(
                    span.start + start as u32,
                    span.start + pos as u32,
                ));
            }
            idx += 1;
            start = pos + 1;
        }
        if idx == n {
            Some(Span::new(span.start + start as u32, span.end))
        } else {
            None
        }
    }

    /// Number of pieces of `span` split on `delim`.
    fn piece_count(&self, span: Span, delim: char) -> usize {
        let bytes = &self.text.as_bytes()[span.range()];
        memchr_iter(delim as u8, bytes).count() + 1
    }

    /// Span of the element at `steps`, None when any position along
    /// the chain is absent.
    pub(crate) fn resolve(&self, steps: &[usize]) -> Option<Span> {
        if steps.is_empty() {
            return Some(self.root_span());
        }
        if steps.len() > 5 {
            return None;
        }
        let key = PathKey::from_steps(steps);
        if let Some(span) = self.cache.borrow_mut().get(&key).copied() {
            return Some(span);
        }
        let parent = self.resolve(&steps[..steps.len() - 1])?;
        let span = self.child_span(parent, steps)?;
        self.cache.borrow_mut().put(key, span);
        Some(span)
    }

    /// Span of the last step of `steps` inside the already-resolved
    /// `parent` slice.
    fn child_span(&self, parent: Span, steps: &[usize]) -> Option<Span> {
        let depth = steps.len();
        let index = steps[depth - 1];
        match Level::at_depth(depth) {
            Level::Message => None,
            Level::Segment => {
                if index < 1 {
                    return None;
                }
                self.piece(parent, Separators::SEGMENT, index - 1)
            }
            Level::Field => {
                let fd = self.separators.field;
                if self.is_msh_segment(parent) {
                    match index {
                        0 => self.piece(parent, fd, 0),
                        // MSH-1 is the delimiter character itself
                        1 => (parent.len() > 3)
                            .then(|| Span::new(parent.start + 3, parent.start + 4)),
                        i => self.piece(parent, fd, i - 1),
                    }
                } else if index == 0 {
                    self.piece(parent, fd, 0)
                } else {
                    self.piece(parent, fd, index)
                }
            }
            _ => {
                if index < 1 {
                    return None;
                }
                // type codes and the MSH encoding fields are leaves
                if steps[1] == 0 {
                    return None;
                }
                if steps[1] <= 2 {
                    let seg = self.resolve(&steps[..1])?;
                    if self.is_msh_segment(seg) {
                        return None;
                    }
                }
                if parent.is_empty() {
                    return None;
                }
                let delim = Level::at_depth(depth - 1).delimiter(&self.separators);
                self.piece(parent, delim, index - 1)
            }
        }
    }

    /// Value of the element at `steps`; None when absent.
    pub(crate) fn value_at(&self, steps: &[usize]) -> Option<String> {
        self.resolve(steps).map(|s| s.slice(&self.text).to_string())
    }

    /// Number of direct children of the element at `steps`.
    pub(crate) fn count_at(&self, steps: &[usize]) -> usize {
        let Some(span) = self.resolve(steps) else {
            return 0;
        };
        match Level::at_depth(steps.len()) {
            Level::Message => self.piece_count(span, Separators::SEGMENT),
            Level::Segment => {
                let pieces = self.piece_count(span, self.separators.field);
                if self.is_msh_segment(span) {
                    // a bare type code has no delimiter field yet
                    if pieces == 1 {
                        0
                    } else {
                        pieces
                    }
                } else {
                    pieces - 1
                }
            }
            Level::Subcomponent => 0,
            level => {
                if steps[1] == 0 || self.msh_fixed_field(steps).is_some() {
                    return 0;
                }
                if span.is_empty() {
                    0
                } else {
                    self.piece_count(span, level.delimiter(&self.separators))
                }
            }
        }
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

    fn invalidate(&mut self) {
        self.cache.get_mut().clear();
    }

    /// Replace the byte range with `replacement` and drop resolved
    /// spans.
    fn splice(&mut self, span: Span, replacement: &str) {
        trace!(
            start = span.start,
            end = span.end,
            new_len = replacement.len(),
            "splice"
        );
        self.text.replace_range(span.range(), replacement);
        self.invalidate();
    }

    fn locate(&self, steps: &[usize]) -> Location {
        let mut present = steps.len();
        while present > 0 && self.resolve(&steps[..present]).is_none() {
            present -= 1;
        }
        if present == steps.len() {
            match self.resolve(steps) {
                Some(span) => Location::Present(span),
                None => Location::Absent {
                    parent: self.root_span(),
                    missing_from: 0,
                },
            }
        } else {
            Location::Absent {
                parent: self.resolve(&steps[..present]).unwrap_or_else(|| self.root_span()),
                missing_from: present,
            }
        }
    }

    /// Delimiters needed to extend the tree from the deepest present
    /// ancestor down to `steps`, followed by the value itself.
    fn extension(&self, steps: &[usize], missing_from: usize, value: &str) -> String {
        let mut ext = String::new();
        let parent_level = Level::at_depth(missing_from);
        let child_index = steps[missing_from];
        let count = self.count_at(&steps[..missing_from]);
        let delim = parent_level.delimiter(&self.separators);
        let needed = match parent_level {
            // an empty slice has no child one to extend from
            Level::Field | Level::Repetition | Level::Component if count == 0 => {
                child_index.saturating_sub(1)
            }
            _ => child_index.saturating_sub(count),
        };
        for _ in 0..needed {
            ext.push(delim);
        }
        for depth in missing_from + 1..steps.len() {
            let delim = Level::at_depth(depth).delimiter(&self.separators);
            // fields sit one piece after the type code
            let lead = if depth == 1 {
                steps[depth]
            } else {
                steps[depth].saturating_sub(1)
            };
            for _ in 0..lead {
                ext.push(delim);
            }
        }
        ext.push_str(value);
        ext
    }

    /// Writes deeper than a leaf or into the fixed MSH region are
    /// structural violations.
    fn guard_fixed(&self, steps: &[usize]) -> Result<()> {
        if steps.len() > 5 {
            return Err(Hl7Error::FixedFieldViolation);
        }
        if steps.len() >= 3 && (steps[1] == 0 || self.msh_fixed_field(steps).is_some()) {
            return Err(Hl7Error::FixedFieldViolation);
        }
        Ok(())
    }

    /// Set or delete the value at `steps`. The entry point behind
    /// every cursor write.
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
                    // a stray MSH-typed segment does not own the
                    // message delimiters
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
            let span = self.resolve(steps).unwrap_or_else(|| self.root_span());
            self.splice(span, value);
            self.separators = separators;
            debug!("rewrote message header");
            return Ok(());
        }
        match self.locate(steps) {
            Location::Present(span) => {
                self.splice(span, value);
            }
            Location::Absent {
                parent,
                missing_from,
            } => {
                let ext = self.extension(steps, missing_from, value);
                self.splice(Span::new(parent.end, parent.end), &ext);
            }
        }
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

        let Some(span) = self.resolve(steps) else {
            // absent position, nothing to shift
            return Ok(());
        };
        let parent_steps = &steps[..steps.len() - 1];
        let parent = self.resolve(parent_steps).unwrap_or_else(|| self.root_span());
        let delim = Level::at_depth(steps.len() - 1).delimiter(&self.separators);
        let index = steps[steps.len() - 1];

        // 0-based piece position of this element inside the parent
        let piece_pos = if steps.len() == 2 {
            let msh = self.is_msh_segment(parent);
            if msh {
                index - 1
            } else {
                index
            }
        } else {
            index - 1
        };
        let pieces = self.piece_count(parent, delim);
        let remove = if piece_pos + 1 < pieces {
            Span::new(span.start, span.end + 1)
        } else if piece_pos > 0 {
            Span::new(span.start - 1, span.end)
        } else {
            span
        };
        self.splice(remove, "");
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
        if parent_steps.len() == 1 && index <= 2 {
            if let Some(seg) = self.resolve(parent_steps) {
                if self.is_msh_segment(seg) {
                    return Err(Hl7Error::FixedFieldViolation);
                }
            }
        }

        let count = self.count_at(parent_steps);
        let mut child_steps = parent_steps.to_vec();
        child_steps.push(index);
        if index > count {
            return self.write_at(&child_steps, value);
        }
        let Some(child) = self.resolve(&child_steps) else {
            return self.write_at(&child_steps, value);
        };
        let delim = Level::at_depth(parent_steps.len()).delimiter(&self.separators);
        let mut ins = String::with_capacity(value.len() + 1);
        ins.push_str(value);
        ins.push(delim);
        self.splice(Span::new(child.start, child.start), &ins);
        Ok(())
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
        if steps.len() == 2 && target <= 2 {
            if let Some(seg) = self.resolve(&steps[..1]) {
                if self.is_msh_segment(seg) {
                    return Err(Hl7Error::FixedFieldViolation);
                }
            }
        }

        let Some(value) = self.value_at(steps) else {
            return Ok(());
        };
        self.delete_at(steps)?;
        self.insert_at(&steps[..steps.len() - 1], target, &value)
    }

    // === MSH-1 / MSH-2 rewrite paths ===

    /// Substitute the field delimiter across the whole message.
    fn set_field_delimiter(&mut self, value: &str) -> Result<()> {
        let mut chars = value.chars();
        let (Some(new_fd), None) = (chars.next(), chars.next()) else {
            return Err(Hl7Error::FixedFieldViolation);
        };
        let old = self.separators;
        if new_fd == old.field {
            return Ok(());
        }
        let separators = Separators::new(
            new_fd,
            old.component,
            old.repetition,
            old.escape,
            old.subcomponent,
        )?;
        self.text = self
            .text
            .chars()
            .map(|c| if c == old.field { new_fd } else { c })
            .collect();
        self.separators = separators;
        self.invalidate();
        debug!(from = %old.field, to = %new_fd, "rewrote field delimiter");
        Ok(())
    }

    /// Substitute the four encoding characters across the whole
    /// message, simultaneously.
    fn set_encoding_characters(&mut self, value: &str) -> Result<()> {
        let chars: Vec<char> = value.chars().collect();
        let [new_comp, new_rep, new_esc, new_sub] = chars[..] else {
            return Err(Hl7Error::FixedFieldViolation);
        };
        let old = self.separators;
        let separators = Separators::new(old.field, new_comp, new_rep, new_esc, new_sub)?;
        if separators == old {
            return Ok(());
        }
        let map = [
            (old.component, new_comp),
            (old.repetition, new_rep),
            (old.escape, new_esc),
            (old.subcomponent, new_sub),
        ];
        self.text = self
            .text
            .chars()
            .map(|c| {
                map.iter()
                    .find(|(from, _)| *from == c)
                    .map(|(_, to)| *to)
                    .unwrap_or(c)
            })
            .collect();
        self.separators = separators;
        self.invalidate();
        debug!(encoding = %value, "rewrote encoding characters");
        Ok(())
    }
}

impl Element for Message {
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
        Some(self.text.clone())
    }

    fn value_count(&self) -> usize {
        Message::value_count(self)
    }

    fn values(&self) -> Vec<String> {
        self.values_at(&[])
    }
}

impl std::str::FromStr for Message {
    type Err = Hl7Error;

    fn from_str(s: &str) -> Result<Message> {
        Message::parse(s)
    }
}

impl Clone for Message {
    fn clone(&self) -> Message {
        Message {
            text: self.text.clone(),
            separators: self.separators,
            cache: new_cache(),
            key: Cell::new(None),
        }
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Message) -> bool {
        self.text == other.text
    }
}

impl Eq for Message {}

impl Hash for Message {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("text", &self.text)
            .field("separators", &self.separators)
            .finish()
    }
}
