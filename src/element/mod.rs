//! The element tree contract shared by both representations.
//!
//! A message is a fixed six-level hierarchy. Every node — segment,
//! field, repetition, component, subcomponent — exposes the same small
//! read surface regardless of whether it is backed by a span into the
//! source string or by an owned node graph.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::separators::Separators;
use crate::error::Result;

/// Tree level of one element. The order is total: each level's
/// children live at the next one down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Message,
    Segment,
    Field,
    Repetition,
    Component,
    Subcomponent,
}

impl Level {
    /// The level of this element's children, or None at the leaf.
    pub fn child(self) -> Option<Level> {
        match self {
            Level::Message => Some(Level::Segment),
            Level::Segment => Some(Level::Field),
            Level::Field => Some(Level::Repetition),
            Level::Repetition => Some(Level::Component),
            Level::Component => Some(Level::Subcomponent),
            Level::Subcomponent => None,
        }
    }

    /// Character separating this element's children, NUL at the leaf.
    pub fn delimiter(self, seps: &Separators) -> char {
        match self {
            Level::Message => Separators::SEGMENT,
            Level::Segment => seps.field,
            Level::Field => seps.repetition,
            Level::Repetition => seps.component,
            Level::Component => seps.subcomponent,
            Level::Subcomponent => '\0',
        }
    }

    /// Depth below the message root: Message = 0, Subcomponent = 5.
    pub(crate) fn depth(self) -> usize {
        match self {
            Level::Message => 0,
            Level::Segment => 1,
            Level::Field => 2,
            Level::Repetition => 3,
            Level::Component => 4,
            Level::Subcomponent => 5,
        }
    }

    /// Inverse of [`Level::depth`]; depths past 5 collapse to the
    /// leaf.
    pub(crate) fn at_depth(depth: usize) -> Level {
        match depth {
            0 => Level::Message,
            1 => Level::Segment,
            2 => Level::Field,
            3 => Level::Repetition,
            4 => Level::Component,
            _ => Level::Subcomponent,
        }
    }
}

/// A descend-or-stop query into a message.
///
/// Each `None` stops the descent at the level above it and the query
/// answers for that element. `segment` is mandatory; deeper steps are
/// ignored after the first stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Path {
    pub segment: usize,
    pub field: Option<usize>,
    pub repetition: Option<usize>,
    pub component: Option<usize>,
    pub subcomponent: Option<usize>,
}

impl Path {
    /// Start a path at a 1-based segment index.
    pub fn segment(index: usize) -> Path {
        Path {
            segment: index,
            ..Path::default()
        }
    }

    /// Descend to a field. Index 0 addresses the type code.
    pub fn field(mut self, index: usize) -> Path {
        self.field = Some(index);
        self
    }

    pub fn repetition(mut self, index: usize) -> Path {
        self.repetition = Some(index);
        self
    }

    pub fn component(mut self, index: usize) -> Path {
        self.component = Some(index);
        self
    }

    pub fn subcomponent(mut self, index: usize) -> Path {
        self.subcomponent = Some(index);
        self
    }

    /// Flatten into index steps, stopping at the first gap.
    pub(crate) fn steps(&self) -> Vec<usize> {
        let mut steps = vec![self.segment];
        for level in [
            self.field,
            self.repetition,
            self.component,
            self.subcomponent,
        ] {
            match level {
                Some(i) => steps.push(i),
                None => break,
            }
        }
        steps
    }
}

/// An element detached from its tree: an owned deep copy carrying the
/// level, the sibling index it was taken from, and its value.
///
/// Detached elements move freely between the parser and builder
/// representations via insert and add-range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detached {
    level: Level,
    index: usize,
    value: Option<String>,
}

impl Detached {
    pub fn new(level: Level, index: usize, value: Option<String>) -> Detached {
        Detached {
            level,
            index,
            value,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Read surface every element exposes.
pub trait Element {
    /// Level of this element.
    fn level(&self) -> Level;

    /// 1-based position among siblings (0 for a segment type code).
    fn index(&self) -> usize;

    /// Character separating this element's children, NUL at leaves.
    fn delimiter(&self) -> char;

    /// Textual value; None when the position is absent.
    fn value(&self) -> Option<String>;

    /// Number of direct children.
    fn value_count(&self) -> usize;

    /// Values of the direct children, in index order.
    fn values(&self) -> Vec<String>;

    /// Owned deep copy, independent of this tree.
    fn detach(&self) -> Detached {
        Detached::new(self.level(), self.index(), self.value())
    }
}

/// Mutation surface every writable element exposes. Semantics are
/// identical across representations; only the mechanics differ.
pub trait ElementMut: Element + Sized {
    /// Replace this element's value. `None` deletes the position,
    /// `Some("")` keeps it present but empty. Writing to an absent
    /// position extends the parent with the requisite delimiters.
    fn set_value(&mut self, value: Option<&str>) -> Result<()>;

    /// Fluent form of `set_value(Some(..))`.
    fn set(&mut self, value: &str) -> Result<&mut Self> {
        self.set_value(Some(value))?;
        Ok(self)
    }

    /// Set or delete the child at `index` without navigating a new
    /// handle.
    fn set_child(&mut self, index: usize, value: Option<&str>) -> Result<()>;

    /// Replace the direct children with `values`: children beyond the
    /// new length are deleted, the rest are overwritten in order.
    fn set_values(&mut self, values: &[&str]) -> Result<()> {
        for i in (values.len() + 1..=self.value_count()).rev() {
            self.delete(i)?;
        }
        for (i, value) in values.iter().enumerate() {
            self.set_child(i + 1, Some(value))?;
        }
        Ok(())
    }

    /// Insert a child at `index`, shifting `index..` up by one.
    fn insert(&mut self, index: usize, value: &str) -> Result<()>;

    /// Insert a detached element's value at `index`. Detached absent
    /// positions insert nothing.
    fn insert_detached(&mut self, index: usize, item: &Detached) -> Result<()> {
        match item.value() {
            Some(value) => self.insert(index, value),
            None => Ok(()),
        }
    }

    /// Delete the child at `index`, shifting `(index + 1)..` down.
    /// Deleting an absent position is a no-op.
    fn delete(&mut self, index: usize) -> Result<()>;

    /// Delete this element from its parent.
    fn remove(self) -> Result<()>;

    /// Move this element to `target` among its siblings. Moving to
    /// the current index is a no-op.
    fn move_to(&mut self, target: usize) -> Result<()>;

    /// Append each detached element at the end, in order.
    fn add_range<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = Detached>;

    /// Delete several children of this element. Positions are removed
    /// highest-first so earlier deletions do not shift later ones.
    fn delete_children(&mut self, indices: &[usize]) -> Result<()> {
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for &i in sorted.iter().rev() {
            self.delete(i)?;
        }
        Ok(())
    }
}

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity key, assigned to a message when its key is
/// first observed.
pub(crate) fn next_message_key() -> u64 {
    NEXT_KEY.fetch_add(1, Ordering::Relaxed)
}
