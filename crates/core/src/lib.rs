//! Core types and traits for SkipScan
//!
//! This crate defines the foundational types used throughout the system:
//! - Tag / TagSet / Position: record addressing and labelling
//! - Query: immutable boolean expression over tag membership, with
//!   implication sets and shortcut resolution
//! - StoreConfig / ShortcutBound: store configuration
//! - Error: Error type hierarchy
//! - Traits: the `ShortcutLookup` seam between queries and shortcut tables

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod query;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use config::{ShortcutBound, StoreConfig, DEFAULT_SEED_SHORTCUT_BOUND, DEFAULT_SHORTCUT_BOUND};
pub use error::{Error, QueryParseError, Result};
pub use query::{and, not, or, tag, ImplicationSet, Query, QueryNode, Shortcut};
pub use traits::ShortcutLookup;
pub use types::{tag_set, Position, Tag, TagSet};
