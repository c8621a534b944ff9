//! Append-only tagged record store
//!
//! Records are appended with a set of tags and a value, and retrieved with
//! boolean [`Query`]s over those tags. Every retrieval is a sequential scan,
//! but scans leave shortcuts behind on the records they visit so that later
//! scans for the same or related queries can skip runs of non-matching
//! records.
//!
//! # Concurrency
//!
//! `find` borrows the store immutably and `add` / `reset_shortcuts` need
//! `&mut self`, so the store cannot change underneath a running scan. Any
//! number of scans may run at once, on one thread or many; they share the
//! per-record shortcut tables, each behind its own lock.
//!
//! # Example
//!
//! ```
//! use skipscan_core::{and, not, tag_set};
//! use skipscan_engine::Store;
//!
//! let mut store = Store::with_bound(4);
//! store.add(tag_set(["a"]), "first");
//! store.add(tag_set(["b"]), "second");
//! store.add(tag_set(["a", "b"]), "third");
//!
//! let hits: Vec<_> = store.find(and("a", not("b"))).collect();
//! assert_eq!(hits, vec![&"first"]);
//! assert!(store.check_integrity());
//! ```

use skipscan_core::{Position, Query, ShortcutBound, StoreConfig, TagSet};
use skipscan_storage::{verify_records, IntegrityViolation, Record};
use tracing::{debug, warn};

use crate::scan::Scan;

/// Append-only store of tagged values
#[derive(Debug)]
pub struct Store<V> {
    /// Seed record first, then one record per `add`
    records: Vec<Record<V>>,
    config: StoreConfig,
}

impl<V> Store<V> {
    /// Create an empty store
    pub fn new(config: StoreConfig) -> Self {
        Store {
            records: vec![Record::seed(config.seed_bound())],
            config,
        }
    }

    /// Create an empty store with the given per-record shortcut bound
    pub fn with_bound(bound: impl Into<ShortcutBound>) -> Self {
        Self::new(StoreConfig::with_bound(bound))
    }

    /// Append a value with its tags, returning its position
    pub fn add(&mut self, tags: TagSet, value: V) -> Position {
        let position = self.records.len();
        self.records.push(Record::new(
            position,
            tags,
            value,
            self.config.shortcut_bound,
        ));
        position
    }

    /// Lazily find the values whose tags match `query`, in position order
    ///
    /// Nothing is scanned until the returned iterator is pulled.
    pub fn find(&self, query: impl Into<Query>) -> Scan<'_, V> {
        Scan::new(&self.records, query.into())
    }

    /// Remove every shortcut
    ///
    /// The next scan for any query costs a full pass over the store.
    pub fn reset_shortcuts(&mut self) {
        let mut cleared = 0;
        for record in &mut self.records {
            let table = record.shortcuts_mut();
            cleared += table.len();
            table.clear();
        }
        debug!(target: "skipscan::store", cleared, "Shortcuts reset");
    }

    /// Total number of shortcuts held across all records
    pub fn shortcut_count(&self) -> usize {
        self.records.iter().map(Record::shortcut_count).sum()
    }

    /// Verify that no shortcut skips over a matching record
    ///
    /// Logs the first violation found and returns `false`.
    pub fn check_integrity(&self) -> bool {
        match self.verify_integrity() {
            Ok(()) => true,
            Err(violation) => {
                warn!(
                    target: "skipscan::integrity",
                    origin = violation.origin,
                    query = %violation.query,
                    shortcut_target = %violation.target,
                    "Integrity violation: {}",
                    violation.kind
                );
                false
            }
        }
    }

    /// Verify shortcut integrity, reporting the first violation found
    pub fn verify_integrity(&self) -> Result<(), IntegrityViolation> {
        verify_records(&self.records)
    }

    /// Number of records, including the seed record
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Number of appended records
    pub fn record_count(&self) -> usize {
        self.records.len() - 1
    }

    /// Whether no records have been appended
    pub fn is_empty(&self) -> bool {
        self.records.len() == 1
    }

    /// Store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Record at `position`; position 0 is the seed record
    pub fn get(&self, position: Position) -> Option<&Record<V>> {
        self.records.get(position)
    }

    /// All records, seed first
    pub fn records(&self) -> &[Record<V>] {
        &self.records
    }
}

impl<V> Default for Store<V> {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl<V> Extend<(TagSet, V)> for Store<V> {
    fn extend<I: IntoIterator<Item = (TagSet, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.records.reserve(iter.size_hint().0);
        for (tags, value) in iter {
            self.add(tags, value);
        }
    }
}
