//! Cursors into a node-backed message.
//!
//! Same handle shape as the parser side: the message reference plus
//! the index path. Reads walk the node graph; writes go through the
//! builder's shared mutation entry points.

use crate::builder::message::MessageBuilder;
use crate::element::{Detached, Element, ElementMut, Level};
use crate::error::Result;

/// Read-only element handle.
#[derive(Clone)]
pub struct Cursor<'b> {
    msg: &'b MessageBuilder,
    steps: Vec<usize>,
}

impl<'b> Cursor<'b> {
    pub(crate) fn new(msg: &'b MessageBuilder, steps: Vec<usize>) -> Cursor<'b> {
        Cursor { msg, steps }
    }

    /// Child handle at `index`. Index 0 is meaningful only at segment
    /// level, where it addresses the type code.
    pub fn child(&self, index: usize) -> Cursor<'b> {
        let mut steps = self.steps.clone();
        steps.push(index);
        Cursor {
            msg: self.msg,
            steps,
        }
    }

    /// Whether this position currently exists in the message.
    pub fn exists(&self) -> bool {
        self.msg.value_at(&self.steps).is_some()
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

/// Writable element handle.
pub struct CursorMut<'b> {
    msg: &'b mut MessageBuilder,
    steps: Vec<usize>,
}

impl<'b> CursorMut<'b> {
    pub(crate) fn new(msg: &'b mut MessageBuilder, steps: Vec<usize>) -> CursorMut<'b> {
        CursorMut { msg, steps }
    }

    /// Descend to the child at `index`, consuming this handle.
    pub fn child(mut self, index: usize) -> CursorMut<'b> {
        self.steps.push(index);
        self
    }

    /// Whether this position currently exists in the message.
    pub fn exists(&self) -> bool {
        self.msg.value_at(&self.steps).is_some()
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
        let b = MessageBuilder::parse(SAMPLE).unwrap();
        let seg = b.segment(2).unwrap();
        assert_eq!(seg.child(0).value(), Some("PID".into()));
        let field = seg.child(3);
        assert_eq!(field.value(), Some("A^B&C~D".into()));
        assert_eq!(field.value_count(), 2);
        assert_eq!(field.delimiter(), '~');
        assert_eq!(field.values(), vec!["A^B&C", "D"]);
        assert_eq!(field.child(1).child(2).child(2).value(), Some("C".into()));
    }

    #[test]
    fn test_mutation_through_cursor() {
        let mut b = MessageBuilder::parse(SAMPLE).unwrap();
        let mut field = b.segment_mut(2).unwrap().child(1);
        field.set("2").unwrap();
        assert_eq!(b.value(), "MSH|^~\\&|\rPID|2||A^B&C~D");
        let mut seg = b.segment_mut(2).unwrap();
        seg.delete(2).unwrap();
        assert_eq!(b.value(), "MSH|^~\\&|\rPID|2|A^B&C~D");
        b.segment_mut(2).unwrap().remove().unwrap();
        assert_eq!(b.value(), "MSH|^~\\&|");
    }

    #[test]
    fn test_detach_transplants_across_representations() {
        let parsed = crate::parser::Message::parse(SAMPLE).unwrap();
        let mut b = MessageBuilder::new();
        b.add_range(parsed.segments().iter().skip(1).map(|s| s.detach()))
            .unwrap();
        assert_eq!(b.value(), "MSH|^~\\&|\rPID|1||A^B&C~D");
    }
}
