//! Shortcut-learning scan engine
//!
//! A [`Scan`] walks a store's records for one query, yielding matching values
//! lazily. As it goes it both uses and leaves behind shortcuts.
//!
//! # Anchors
//!
//! The scan keeps, for each query it is tracking, the most recent record
//! known to match it (its anchor). When a later record matches, nothing in
//! between can have matched, so the anchor gets a shortcut straight to the
//! new match. Tracking starts, at the current record, for every query in the
//! searched query's `true_if_true` set. The seed record is visited first, so
//! the first shortcut for each tracked query lands on the seed.
//!
//! # Skipping
//!
//! At every record the searched query resolves a shortcut from that record's
//! table. Taking it skips records the scan never tests, so only anchors whose
//! query is in the shortcut query's `false_if_false` set survive: they are
//! the only ones known to be false across the skipped range.
//!
//! # Completion
//!
//! When the scan runs off the end, every surviving anchor gets an
//! end-of-store shortcut. A scan dropped early writes nothing more.

use std::iter::FusedIterator;

use rustc_hash::FxHashMap;
use skipscan_core::{Position, Query, Shortcut};
use skipscan_storage::{Record, Target};
use tracing::debug;

/// Counters describing a scan's progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Records whose tags were tested (the seed record is never tested)
    pub match_count: usize,
    /// Shortcuts written to record tables
    pub shortcuts_written: usize,
    /// Shortcuts taken
    pub skips_taken: usize,
}

/// Lazy, forward-only evaluation of one query over a store
///
/// Created by [`Store::find`](crate::Store::find). Not restartable; call
/// `find` again for a fresh scan.
pub struct Scan<'a, V> {
    records: &'a [Record<V>],
    query: Query,
    /// Next record to examine
    position: Position,
    /// Query -> position of the most recent record known to match it
    anchors: FxHashMap<Query, Position>,
    stats: ScanStats,
    finished: bool,
}

impl<'a, V> Scan<'a, V> {
    pub(crate) fn new(records: &'a [Record<V>], query: Query) -> Self {
        Scan {
            records,
            query,
            position: 0,
            anchors: FxHashMap::default(),
            stats: ScanStats::default(),
            finished: false,
        }
    }

    /// The query being evaluated
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Records tag-tested so far
    pub fn match_count(&self) -> usize {
        self.stats.match_count
    }

    /// All counters so far
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Whether the scan has run to the end of the store
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Examine one record, returning its value if it matches
    fn step(&mut self) -> Option<&'a V> {
        let records = self.records;
        let p = self.position;
        let record = &records[p];

        if let Some(tags) = record.tags() {
            self.stats.match_count += 1;
            for (query, anchor) in self.anchors.iter_mut() {
                if query.matches(tags) {
                    if p > *anchor + 1 {
                        records[*anchor]
                            .shortcuts()
                            .put(query.clone(), Target::Match(p));
                        self.stats.shortcuts_written += 1;
                    }
                    *anchor = p;
                }
            }
        }

        for implied in self.query.true_if_true().iter() {
            if !self.anchors.contains_key(implied) {
                self.anchors.insert(implied.clone(), p);
            }
        }

        let shortcut = self.query.find_shortcut(&mut *record.shortcuts());
        match shortcut {
            Some(Shortcut { query, target }) => {
                debug_assert!(target > p, "shortcut from {} must lead forward, got {}", p, target);
                let still_false = query.false_if_false();
                self.anchors.retain(|q, _| still_false.contains(q));
                self.position = target.max(p + 1);
                self.stats.skips_taken += 1;
            }
            None => self.position = p + 1,
        }

        if record.matches(&self.query) {
            record.value()
        } else {
            None
        }
    }

    /// Point every surviving anchor at the end of the store
    fn finish(&mut self) {
        self.finished = true;
        let end = self.records.len();
        for (query, anchor) in self.anchors.drain() {
            self.records[anchor]
                .shortcuts()
                .put(query, Target::End(end));
            self.stats.shortcuts_written += 1;
        }
        debug!(
            target: "skipscan::scan",
            query = %self.query,
            records = end,
            match_count = self.stats.match_count,
            shortcuts_written = self.stats.shortcuts_written,
            skips_taken = self.stats.skips_taken,
            "Scan finished"
        );
    }
}

impl<'a, V> Iterator for Scan<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        if self.finished {
            return None;
        }
        while self.position < self.records.len() {
            if let Some(value) = self.step() {
                return Some(value);
            }
        }
        self.finish();
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            (0, Some(self.records.len().saturating_sub(self.position.max(1))))
        }
    }
}

impl<V> FusedIterator for Scan<'_, V> {}

impl<V> std::fmt::Debug for Scan<'_, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scan")
            .field("query", &self.query)
            .field("position", &self.position)
            .field("anchors", &self.anchors.len())
            .field("stats", &self.stats)
            .field("finished", &self.finished)
            .finish()
    }
}
