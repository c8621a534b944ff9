//! SkipScan - append-only tagged record store with learned scan shortcuts
//!
//! Values are appended with a set of string tags and retrieved with boolean
//! queries over those tags. Retrieval is always a sequential scan, but each
//! scan records shortcuts on the records it passes ("from here, the next
//! record matching this query is at position p") and later scans for the same
//! or logically related queries jump along them.
//!
//! # Quick Start
//!
//! ```
//! use skipscan::{and, not, or, tag_set, Store};
//!
//! let mut store = Store::with_bound(8);
//! store.add(tag_set(["red", "small"]), 1);
//! store.add(tag_set(["blue"]), 2);
//! store.add(tag_set(["red"]), 3);
//!
//! let red: Vec<_> = store.find("red").copied().collect();
//! assert_eq!(red, vec![1, 3]);
//!
//! // The second scan jumps along shortcuts learned by the first
//! let mut scan = store.find(and("red", not("small")));
//! assert_eq!(scan.next(), Some(&3));
//!
//! let either: Vec<_> = store.find(or("blue", "small")).copied().collect();
//! assert_eq!(either, vec![1, 2]);
//! assert!(store.check_integrity());
//! ```
//!
//! Queries can also be parsed from text:
//!
//! ```
//! use skipscan::Query;
//!
//! let q: Query = "red & !(small | large)".parse().unwrap();
//! assert_eq!(q.as_str(), r#"("red" AND (!("small" OR "large")))"#);
//! ```
//!
//! # Architecture
//!
//! - `skipscan-core`: queries, their implication sets, configuration, errors
//! - `skipscan-storage`: records, bounded LRU shortcut tables, integrity checks
//! - `skipscan-engine`: the store, the scan engine, synthetic workloads

pub use skipscan_core::{
    and, not, or, tag, tag_set, Error, ImplicationSet, Position, Query, QueryNode,
    QueryParseError, Result, Shortcut, ShortcutBound, ShortcutLookup, StoreConfig, Tag, TagSet,
    DEFAULT_SEED_SHORTCUT_BOUND, DEFAULT_SHORTCUT_BOUND,
};
pub use skipscan_engine::{workload, Scan, ScanStats, Store};
pub use skipscan_storage::{IntegrityViolation, Record, ShortcutTable, Target, ViolationKind};
