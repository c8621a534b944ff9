//! Storage layer for SkipScan
//!
//! This crate implements the per-record structures a store is built from:
//! - ShortcutTable: bounded, least-recently-used map from query to target
//! - Record: one appended (tags, value) pair plus its shortcut table
//! - Integrity: verification that no shortcut skips a matching record
//!
//! # Concurrency
//!
//! Each record's shortcut table sits behind its own `parking_lot::Mutex`.
//! Scans only ever hold one table lock at a time, so unrelated scans never
//! serialize on a store-wide lock.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod integrity;
pub mod record;
pub mod shortcuts;

pub use integrity::{verify_records, IntegrityViolation, ViolationKind};
pub use record::Record;
pub use shortcuts::{ShortcutTable, Target};
