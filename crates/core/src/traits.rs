//! Core traits for shortcut resolution
//!
//! Queries resolve shortcuts through the `ShortcutLookup` trait so the query
//! algebra does not depend on any particular table implementation.

use crate::query::Query;
use crate::types::Position;

/// Read access to a record's shortcut table
///
/// A lookup counts as an access for recency-ordered tables, hence `&mut self`.
pub trait ShortcutLookup {
    /// Target position recorded for `query`, if any
    fn lookup(&mut self, query: &Query) -> Option<Position>;
}

impl<S: std::hash::BuildHasher> ShortcutLookup for std::collections::HashMap<Query, Position, S> {
    fn lookup(&mut self, query: &Query) -> Option<Position> {
        self.get(query).copied()
    }
}
