//! Record addressing and labelling types
//!
//! Tags are opaque strings compared by exact match. A record's tags form an
//! unordered set with no duplicates.

use rustc_hash::FxHashSet;

/// Opaque tag identifier; no normalization is applied
pub type Tag = String;

/// Unordered set of unique tags attached to one record
pub type TagSet = FxHashSet<Tag>;

/// Index of a record in a store's append sequence
///
/// Position 0 is always the synthetic seed record. A position equal to the
/// store length is the "no further match" sentinel.
pub type Position = usize;

/// Build a [`TagSet`] from anything yielding string-like items
///
/// # Example
///
/// ```
/// use skipscan_core::tag_set;
///
/// let tags = tag_set(["a", "b", "a"]);
/// assert_eq!(tags.len(), 2);
/// assert!(tags.contains("b"));
/// ```
pub fn tag_set<I, S>(tags: I) -> TagSet
where
    I: IntoIterator<Item = S>,
    S: Into<Tag>,
{
    tags.into_iter().map(Into::into).collect()
}
