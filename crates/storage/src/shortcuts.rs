//! Per-record shortcut table
//!
//! A shortcut `query -> target` on the record at position `x` records that no
//! record strictly between `x` and `target` matches `query`.
//!
//! # Design
//!
//! - Slab of nodes threaded on an intrusive doubly-linked recency list
//! - FxHashMap from query to slot for O(1) lookups
//! - Both `get` and `put` move the entry to the front of the list
//! - Inserting past the bound evicts the back of the list and reuses its slot

use rustc_hash::FxHashMap;
use skipscan_core::{Position, Query, ShortcutBound, ShortcutLookup};
use std::fmt;

/// Where a shortcut leads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The record at this position matches the query
    Match(Position),
    /// Nothing matched up to this position, which was the store length when
    /// the shortcut was written
    ///
    /// Records appended later start at this position, so the skip still
    /// lands on the first record the shortcut knows nothing about.
    End(Position),
}

impl Target {
    /// Position a scan continues from
    #[inline]
    pub fn position(self) -> Position {
        match self {
            Target::Match(p) | Target::End(p) => p,
        }
    }

    /// Whether this is an end-of-store sentinel
    #[inline]
    pub fn is_end(self) -> bool {
        matches!(self, Target::End(_))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Match(p) => write!(f, "{}", p),
            Target::End(p) => write!(f, "end@{}", p),
        }
    }
}

const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node {
    query: Query,
    target: Target,
    prev: usize,
    next: usize,
}

/// Bounded map from query to target with least-recently-used eviction
#[derive(Debug)]
pub struct ShortcutTable {
    bound: ShortcutBound,
    index: FxHashMap<Query, usize>,
    nodes: Vec<Node>,
    /// Most recently used slot
    head: usize,
    /// Least recently used slot
    tail: usize,
}

impl ShortcutTable {
    /// Create an empty table with the given bound
    pub fn new(bound: ShortcutBound) -> Self {
        Self {
            bound,
            index: FxHashMap::default(),
            nodes: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    /// Maximum number of entries retained
    pub fn bound(&self) -> ShortcutBound {
        self.bound
    }

    /// Target for `query`, marking it most recently used
    pub fn get(&mut self, query: &Query) -> Option<Target> {
        let slot = *self.index.get(query)?;
        self.touch(slot);
        Some(self.nodes[slot].target)
    }

    /// Target for `query` without changing recency
    pub fn peek(&self, query: &Query) -> Option<Target> {
        self.index.get(query).map(|&slot| self.nodes[slot].target)
    }

    /// Insert or refresh `query`, marking it most recently used
    ///
    /// Returns the query evicted to stay within the bound, if any. With a
    /// bound of zero nothing is retained and the inserted query itself is
    /// returned.
    pub fn put(&mut self, query: Query, target: Target) -> Option<Query> {
        if let Some(&slot) = self.index.get(&query) {
            self.nodes[slot].target = target;
            self.touch(slot);
            return None;
        }

        if self.bound.limit() == Some(0) {
            return Some(query);
        }

        if self.bound.is_exceeded_by(self.index.len() + 1) {
            // Reuse the least recently used slot
            let slot = self.tail;
            self.unlink(slot);
            let evicted = std::mem::replace(&mut self.nodes[slot].query, query.clone());
            self.index.remove(&evicted);
            self.nodes[slot].target = target;
            self.index.insert(query, slot);
            self.push_front(slot);
            return Some(evicted);
        }

        let slot = self.nodes.len();
        self.nodes.push(Node {
            query: query.clone(),
            target,
            prev: NIL,
            next: NIL,
        });
        self.index.insert(query, slot);
        self.push_front(slot);
        None
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Entries from most to least recently used, without touching them
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            table: self,
            cursor: self.head,
        }
    }

    fn touch(&mut self, slot: usize) {
        if self.head != slot {
            self.unlink(slot);
            self.push_front(slot);
        }
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }
        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = NIL;
    }

    fn push_front(&mut self, slot: usize) {
        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = slot;
        }
        self.head = slot;
        if self.tail == NIL {
            self.tail = slot;
        }
    }
}

impl ShortcutLookup for ShortcutTable {
    fn lookup(&mut self, query: &Query) -> Option<Position> {
        self.get(query).map(Target::position)
    }
}

/// Iterator over a table's entries, most recently used first
pub struct Iter<'a> {
    table: &'a ShortcutTable,
    cursor: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Query, Target);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let node = &self.table.nodes[self.cursor];
        self.cursor = node.next;
        Some((&node.query, node.target))
    }
}
