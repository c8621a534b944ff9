//! Shortcut integrity verification
//!
//! For every record at position `x` and every shortcut `query -> target` it
//! holds:
//!
//! - `target` lies in `(x, len]`
//! - no record strictly between `x` and `target` matches `query`
//! - a `Target::Match` lands on a record that matches `query`
//!
//! This is a diagnostic pass; scans never run it. Cost is proportional to
//! the total distance covered by all shortcuts.

use skipscan_core::{Position, Query};
use std::fmt;
use thiserror::Error;

use crate::record::Record;
use crate::shortcuts::Target;

/// How a shortcut broke the invariant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// The record at this position matches but is skipped over
    SkippedMatch {
        /// Position of the skipped record
        position: Position,
    },
    /// The target record does not match the query
    TargetMismatch,
    /// The target is not after the source or is past the end of the store
    TargetOutOfRange,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::SkippedMatch { position } => {
                write!(f, "skips matching record at position {}", position)
            }
            ViolationKind::TargetMismatch => f.write_str("target record does not match"),
            ViolationKind::TargetOutOfRange => f.write_str("target out of range"),
        }
    }
}

/// A shortcut that breaks the integrity invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("shortcut {query} -> {target} on record {origin}: {kind}")]
pub struct IntegrityViolation {
    /// Position of the record holding the shortcut
    pub origin: Position,
    /// The shortcut's query
    pub query: Query,
    /// The shortcut's target
    pub target: Target,
    /// What is wrong with it
    pub kind: ViolationKind,
}

/// Check every shortcut on every record, stopping at the first violation
///
/// `records` must be a whole store, seed first.
pub fn verify_records<V>(records: &[Record<V>]) -> Result<(), IntegrityViolation> {
    let len = records.len();

    for record in records {
        let origin = record.position();
        let table = record.shortcuts();

        for (query, target) in table.iter() {
            let violation = |kind| IntegrityViolation {
                origin,
                query: query.clone(),
                target,
                kind,
            };

            let to = target.position();
            if to <= origin || to > len {
                return Err(violation(ViolationKind::TargetOutOfRange));
            }

            if let Some(skipped) = records[origin + 1..to].iter().find(|r| r.matches(query)) {
                return Err(violation(ViolationKind::SkippedMatch {
                    position: skipped.position(),
                }));
            }

            if let Target::Match(p) = target {
                if p == len {
                    return Err(violation(ViolationKind::TargetOutOfRange));
                }
                if !records[p].matches(query) {
                    return Err(violation(ViolationKind::TargetMismatch));
                }
            }
        }
    }

    Ok(())
}
