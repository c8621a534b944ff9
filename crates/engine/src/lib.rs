//! Store and scan engine for SkipScan
//!
//! This crate ties the lower layers together:
//! - Store: append-only record sequence with a leading seed record
//! - Scan: lazy, pull-based query evaluation that learns shortcuts as it goes
//! - Workload: seeded synthetic data and query generators for benchmarks
//!
//! The scan engine is the only component that writes shortcuts.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod scan;
pub mod store;
pub mod workload;

pub use scan::{Scan, ScanStats};
pub use store::Store;
