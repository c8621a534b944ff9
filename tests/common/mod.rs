//! Shared helpers for the integration test suites.
//!
//! Import via `mod common;` from any test file.

#![allow(dead_code)]

use proptest::prelude::*;
use skipscan::{and, not, or, Query, ShortcutBound, Store, TagSet};

/// Tags drawn by the strategies below
pub const TAGS: [&str; 4] = ["a", "b", "c", "d"];

/// Store holding each tag set, valued by its 1-based position
pub fn store_of(tag_sets: &[TagSet], bound: ShortcutBound) -> Store<usize> {
    let mut store = Store::with_bound(bound);
    for (i, tags) in tag_sets.iter().enumerate() {
        store.add(tags.clone(), i + 1);
    }
    store
}

/// Positions of the records matching `query`, by direct evaluation
pub fn naive_find(tag_sets: &[TagSet], query: &Query) -> Vec<usize> {
    tag_sets
        .iter()
        .enumerate()
        .filter(|(_, tags)| query.matches(tags))
        .map(|(i, _)| i + 1)
        .collect()
}

/// Run `query` to completion, returning the values found and the match count
pub fn run(store: &Store<usize>, query: &Query) -> (Vec<usize>, usize) {
    let mut scan = store.find(query);
    let found = scan.by_ref().copied().collect();
    (found, scan.match_count())
}

// ============================================================================
// Strategies
// ============================================================================

pub fn arb_tag_set() -> impl Strategy<Value = TagSet> {
    prop::sample::subsequence(TAGS.to_vec(), 0..=TAGS.len())
        .prop_map(|tags| tags.into_iter().map(String::from).collect::<TagSet>())
}

pub fn arb_tag_sets(max: usize) -> impl Strategy<Value = Vec<TagSet>> {
    prop::collection::vec(arb_tag_set(), 0..max)
}

pub fn arb_query() -> impl Strategy<Value = Query> {
    let leaf = prop::sample::select(TAGS.to_vec()).prop_map(|t: &str| Query::tag(t));
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|q| not(q)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| and(a, b)),
            (inner.clone(), inner).prop_map(|(a, b)| or(a, b)),
        ]
    })
}

pub fn arb_bound() -> impl Strategy<Value = ShortcutBound> {
    prop_oneof![
        (0usize..4).prop_map(ShortcutBound::Limited),
        Just(ShortcutBound::Unbounded),
    ]
}
