//! Stored records
//!
//! A record is immutable once appended apart from its shortcut table. The
//! record at position 0 is a synthetic seed with no tags and no value; it
//! exists so scans have somewhere to hang shortcuts that skip into the store
//! before any real record has been examined.

use parking_lot::{Mutex, MutexGuard};
use skipscan_core::{Position, Query, ShortcutBound, TagSet};

use crate::shortcuts::ShortcutTable;

/// One appended (tags, value) pair and its shortcuts
#[derive(Debug)]
pub struct Record<V> {
    position: Position,
    /// `None` only for the seed record
    entry: Option<(TagSet, V)>,
    shortcuts: Mutex<ShortcutTable>,
}

impl<V> Record<V> {
    /// The synthetic seed record at position 0
    pub fn seed(bound: ShortcutBound) -> Self {
        Record {
            position: 0,
            entry: None,
            shortcuts: Mutex::new(ShortcutTable::new(bound)),
        }
    }

    /// An ordinary record
    pub fn new(position: Position, tags: TagSet, value: V, bound: ShortcutBound) -> Self {
        debug_assert!(position > 0, "position 0 is reserved for the seed record");
        Record {
            position,
            entry: Some((tags, value)),
            shortcuts: Mutex::new(ShortcutTable::new(bound)),
        }
    }

    /// Position in the store
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether this is the synthetic seed record
    #[inline]
    pub fn is_seed(&self) -> bool {
        self.entry.is_none()
    }

    /// Tags, or `None` for the seed record
    pub fn tags(&self) -> Option<&TagSet> {
        self.entry.as_ref().map(|(tags, _)| tags)
    }

    /// Value, or `None` for the seed record
    pub fn value(&self) -> Option<&V> {
        self.entry.as_ref().map(|(_, value)| value)
    }

    /// Whether `query` matches this record; the seed record never matches
    #[inline]
    pub fn matches(&self, query: &Query) -> bool {
        match &self.entry {
            Some((tags, _)) => query.matches(tags),
            None => false,
        }
    }

    /// Lock this record's shortcut table
    pub fn shortcuts(&self) -> MutexGuard<'_, ShortcutTable> {
        self.shortcuts.lock()
    }

    /// Shortcut table through exclusive access, without locking
    pub fn shortcuts_mut(&mut self) -> &mut ShortcutTable {
        self.shortcuts.get_mut()
    }

    /// Number of shortcuts currently held
    pub fn shortcut_count(&self) -> usize {
        self.shortcuts.lock().len()
    }
}
