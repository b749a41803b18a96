//! Cursors into a string-backed message.
//!
//! A cursor is a thin handle: the message reference plus the index
//! path from the root. Nothing is materialized until a value is read,
//! and resolved spans are cached inside the message.

use crate::element::{Detached, Element, ElementMut, Level};
use crate::error::Result;
use crate::parser::message::Message;

/// Read-only element handle.
///
/// Cursors address positions, not content: a cursor to an absent
/// position is valid and reads as `None`.
#[derive(Clone)]
pub struct Cursor<'m> {
    msg: &'m Message,
    steps: Vec<usize>,
}

impl<'m> std::fmt::Debug for Cursor<'m> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor").field("steps", &self.steps).finish()
    }
}

impl<'m> Cursor<'m> {
    pub(crate) fn new(msg: &'m Message, steps: Vec<usize>) -> Cursor<'m> {
        Cursor { msg, steps }
    }

    /// Child handle at `index`. Index 0 is meaningful only at segment
    /// level, where it addresses the type code.
    pub fn child(&self, index: usize) -> Cursor<'m> {
        let mut steps = self.steps.clone();
        steps.push(index);
        Cursor {
            msg: self.msg,
            steps,
        }
    }

    /// Whether this position currently exists in the message.
    pub fn exists(&self) -> bool {
        self.msg.resolve(&self.steps).is_some()
    }
}

impl Element for Cursor<'_> {
    fn level(&self) -> Level {
        Level::at_depth(self.steps.len())
    }

    fn index(&self) -> usize {
        self.steps.last().copied().unwrap_or(1)
    }

    fn delimiter(&self) -> char {
        self.msg.delimiter_at(&self.steps)
    }

    fn value(&self) -> Option<String> {
        self.msg.value_at(&self.steps)
    }

    fn value_count(&self) -> usize {
        self.msg.count_at(&self.steps)
    }

    fn values(&self) -> Vec<String> {
        self.msg.values_at(&self.steps)
    }
}

/// Writable element handle. Holds the message exclusively, so stale
/// spans cannot be observed across an edit.
pub struct CursorMut<'m> {
    msg: &'m mut Message,
    steps: Vec<usize>,
}

impl<'m> CursorMut<'m> {
    pub(crate) fn new(msg: &'m mut Message, steps: Vec<usize>) -> CursorMut<'m> {
        CursorMut { msg, steps }
    }

    /// Descend to the child at `index`, consuming this handle.
    pub fn child(mut self, index: usize) -> CursorMut<'m> {
        self.steps.push(index);
        self
    }

    /// Whether this position currently exists in the message.
    pub fn exists(&self) -> bool {
        self.msg.resolve(&self.steps).is_some()
    }
}

impl Element for CursorMut<'_> {
    fn level(&self) -> Level {
        Level::at_depth(self.steps.len())
    }

    fn index(&self) -> usize {
        self.steps.last().copied().unwrap_or(1)
    }

    fn delimiter(&self) -> char {
        self.msg.delimiter_at(&self.steps)
    }

    fn value(&self) -> Option<String> {
        self.msg.value_at(&self.steps)
    }

    fn value_count(&self) -> usize {
        self.msg.count_at(&self.steps)
    }

    fn values(&self) -> Vec<String> {
        self.msg.values_at(&self.steps)
    }
}

impl ElementMut for CursorMut<'_> {
    fn set_value(&mut self, value: Option<&str>) -> Result<()> {
        self.msg.set_at(&self.steps, value)
    }

    fn set_child(&mut self, index: usize, value: Option<&str>) -> Result<()> {
        let mut child = self.steps.clone();
        child.push(index);
        self.msg.set_at(&child, value)
    }

    fn insert(&mut self, index: usize, value: &str) -> Result<()> {
        self.msg.insert_at(&self.steps, index, value)
    }

    fn delete(&mut self, index: usize) -> Result<()> {
        let mut child = self.steps.clone();
        child.push(index);
        self.msg.delete_at(&child)
    }

    fn remove(self) -> Result<()> {
        self.msg.delete_at(&self.steps)
    }

    fn move_to(&mut self, target: usize) -> Result<()> {
        self.msg.move_at(&self.steps, target)
    }

    fn add_range<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = Detached>,
    {
        for item in items {
            if let Some(value) = item.value() {
                let mut child = self.steps.clone();
                child.push(self.msg.count_at(&self.steps) + 1);
                self.msg.set_at(&child, Some(value))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "MSH|^~\\&|\rPID|1||A^B&C~D";

    #[test]
    fn test_navigation() {
        let m = Message::parse(SAMPLE).unwrap();
        let seg = m.segment(2).unwrap();
        assert_eq!(seg.level(), Level::Segment);
        assert_eq!(seg.index(), 2);
        assert_eq!(seg.child(0).value(), Some("PID".into()));
        let field = seg.child(3);
        assert_eq!(field.value(), Some("A^B&C~D".into()));
        assert_eq!(field.delimiter(), '~');
        assert_eq!(field.value_count(), 2);
        assert_eq!(field.values(), vec!["A^B&C", "D"]);
        let comp = field.child(1).child(2);
        assert_eq!(comp.value(), Some("B&C".into()));
        assert_eq!(comp.child(1).value(), Some("B".into()));
        assert_eq!(comp.child(2).value(), Some("C".into()));
    }

    #[test]
    fn test_absent_positions_read_as_none() {
        let m = Message::parse(SAMPLE).unwrap();
        let seg = m.segment(2).unwrap();
        assert!(!seg.child(9).exists());
        assert_eq!(seg.child(9).value(), None);
        assert_eq!(seg.child(9).value_count(), 0);
        // below a subcomponent nothing is addressable
        let sub = seg.child(3).child(1).child(2).child(1);
        assert_eq!(sub.value(), Some("B".into()));
        assert_eq!(sub.child(1).value(), None);
        assert_eq!(sub.delimiter(), '\0');
    }

    #[test]
    fn test_detach_preserves_value_and_index() {
        let m = Message::parse(SAMPLE).unwrap();
        let d = m.segment(2).unwrap().child(3).detach();
        assert_eq!(d.level(), Level::Field);
        assert_eq!(d.index(), 3);
        assert_eq!(d.value(), Some("A^B&C~D"));
    }

    #[test]
    fn test_mutation_through_cursor() {
        let mut m = Message::parse(SAMPLE).unwrap();
        let mut field = m.segment_mut(2).unwrap().child(1);
        field.set("2").unwrap();
        assert_eq!(m.value(), "MSH|^~\\&|\rPID|2||A^B&C~D");
        let mut seg = m.segment_mut(2).unwrap();
        seg.delete(2).unwrap();
        assert_eq!(m.value(), "MSH|^~\\&|\rPID|2|A^B&C~D");
    }

    #[test]
    fn test_remove_and_move() {
        let mut m = Message::parse("MSH|^~\\&|\rAAA|1\rBBB|2").unwrap();
        m.segment_mut(3).unwrap().move_to(2).unwrap();
        assert_eq!(m.value(), "MSH|^~\\&|\rBBB|2\rAAA|1");
        m.segment_mut(2).unwrap().remove().unwrap();
        assert_eq!(m.value(), "MSH|^~\\&|\rAAA|1");
    }

    #[test]
    fn test_add_range_appends() {
        let mut m = Message::parse("MSH|^~\\&|\rPID|a").unwrap();
        let items = vec![
            Detached::new(Level::Field, 2, Some("b".into())),
            Detached::new(Level::Field, 3, None),
            Detached::new(Level::Field, 4, Some("c".into())),
        ];
        m.segment_mut(2).unwrap().add_range(items).unwrap();
        assert_eq!(m.value(), "MSH|^~\\&|\rPID|a|b|c");
    }
}
