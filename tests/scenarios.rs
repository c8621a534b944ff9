//! End-to-end store scenarios
//!
//! Small hand-built stores whose scans can be followed record by record.

mod common;

use common::{naive_find, run, store_of};
use rand::rngs::StdRng;
use rand::SeedableRng;
use skipscan::workload::{bernoulli_tag_sets, numbered_tags, overlapping_queries};
use skipscan::{and, not, or, tag, tag_set, Query, ShortcutBound, Store, TagSet, Target};

fn abc_store() -> Store<&'static str> {
    let mut store = Store::with_bound(8);
    store.add(tag_set(["a"]), "first");
    store.add(tag_set(["b"]), "second");
    store.add(tag_set(["a", "b"]), "third");
    store
}

/// `count` records tagged "hit" at the listed positions and "miss" elsewhere
fn sparse_tags(count: usize, hits: &[usize]) -> Vec<TagSet> {
    (1..=count)
        .map(|p| tag_set([if hits.contains(&p) { "hit" } else { "miss" }]))
        .collect()
}

// ============================================================================
// Three-record store
// ============================================================================

#[test]
fn tag_query_yields_first_and_third() {
    let store = abc_store();
    let mut scan = store.find(tag("a"));
    let found: Vec<_> = scan.by_ref().copied().collect();
    assert_eq!(found, vec!["first", "third"]);
    assert!(scan.match_count() <= 3);
    assert!(store.check_integrity());
}

#[test]
fn and_not_yields_only_first() {
    let store = abc_store();
    let found: Vec<_> = store.find(and("a", not("b"))).copied().collect();
    assert_eq!(found, vec!["first"]);
    assert!(store.check_integrity());
}

#[test]
fn or_rerun_is_stable_and_no_slower() {
    let store = abc_store();
    let query = or("a", "b");

    let mut first = store.find(&query);
    let first_found: Vec<_> = first.by_ref().copied().collect();
    let mut second = store.find(&query);
    let second_found: Vec<_> = second.by_ref().copied().collect();

    assert_eq!(first_found, vec!["first", "second", "third"]);
    assert_eq!(first_found, second_found);
    assert!(second.match_count() <= first.match_count());
    assert!(store.check_integrity());
}

// ============================================================================
// Shortcut reuse
// ============================================================================

#[test]
fn rerun_tests_only_matches() {
    let tags = sparse_tags(10, &[3, 8]);
    let store = store_of(&tags, ShortcutBound::Limited(4));

    assert_eq!(run(&store, &tag("hit")), (vec![3, 8], 10));
    assert_eq!(run(&store, &tag("hit")), (vec![3, 8], 2));
}

#[test]
fn independently_built_queries_share_shortcuts() {
    let tags = sparse_tags(10, &[3, 8]);
    let store = store_of(&tags, ShortcutBound::Limited(4));

    let built: Query = and("hit", not("x"));
    let parsed: Query = r#"hit & !x"#.parse().unwrap();
    assert_eq!(built, parsed);

    assert_eq!(run(&store, &built), (vec![3, 8], 10));
    assert_eq!(run(&store, &parsed), (vec![3, 8], 2));

    let seed = store.get(0).unwrap();
    assert_eq!(seed.shortcuts().peek(&parsed), Some(Target::Match(3)));
}

#[test]
fn conjunction_reuses_conjunct_shortcuts() {
    let tags = sparse_tags(20, &[5, 15]);
    let store = store_of(&tags, ShortcutBound::Limited(4));

    let _ = run(&store, &tag("hit"));
    // The "hit" shortcuts bound the conjunction: it can only be true where "hit" is
    let (found, tests) = run(&store, &and("hit", "miss"));
    assert!(found.is_empty());
    assert_eq!(tests, 2);
    assert!(store.check_integrity());
}

#[test]
fn reset_is_idempotent() {
    let tags = sparse_tags(12, &[2, 7, 11]);
    let mut store = store_of(&tags, ShortcutBound::Limited(4));
    let _ = run(&store, &or("hit", not("miss")));
    assert!(store.shortcut_count() > 0);

    store.reset_shortcuts();
    assert_eq!(store.shortcut_count(), 0);
    assert!(store.check_integrity());
    store.reset_shortcuts();
    assert_eq!(store.shortcut_count(), 0);
    assert!(store.check_integrity());

    assert_eq!(run(&store, &tag("hit")), (vec![2, 7, 11], 12));
}

#[test]
fn zero_bound_keeps_nothing_but_stays_correct() {
    let tags = sparse_tags(9, &[1, 4, 9]);
    let store = store_of(&tags, ShortcutBound::Limited(0));

    for _ in 0..3 {
        assert_eq!(run(&store, &tag("hit")), (vec![1, 4, 9], 9));
    }
    // Only the seed table, which has its own bound, holds anything
    let non_seed: usize = store.records()[1..].iter().map(|r| r.shortcut_count()).sum();
    assert_eq!(non_seed, 0);
}

#[test]
fn tables_respect_bound() {
    let mut rng = StdRng::seed_from_u64(17);
    let universe = numbered_tags(8);
    let tags = bernoulli_tag_sets(&mut rng, 300, &universe, 0.3);
    let store = store_of(&tags, ShortcutBound::Limited(2));

    let queries: Vec<Query> = (0..8)
        .flat_map(|i| {
            let t = i.to_string();
            let u = ((i + 3) % 8).to_string();
            [tag(t.as_str()), and(t.as_str(), u.as_str()), or(t.as_str(), not(u.as_str()))]
        })
        .collect();
    for q in &queries {
        let _ = run(&store, q);
    }

    for record in &store.records()[1..] {
        assert!(record.shortcut_count() <= 2);
    }
    assert!(store.check_integrity());
}

// ============================================================================
// Appends between scans
// ============================================================================

#[test]
fn appended_records_are_found() {
    let mut tags = sparse_tags(6, &[2]);
    let mut store = store_of(&tags, ShortcutBound::Limited(4));
    assert_eq!(run(&store, &tag("hit")).0, vec![2]);

    for extra in sparse_tags(4, &[2, 4]) {
        tags.push(extra.clone());
        store.add(extra, tags.len());
    }
    assert!(store.check_integrity());
    assert_eq!(run(&store, &tag("hit")).0, vec![2, 8, 10]);
    assert!(store.check_integrity());
}

#[test]
fn interleaved_adds_and_scans_stay_sound() {
    let mut rng = StdRng::seed_from_u64(99);
    let universe = numbered_tags(6);
    let mut tags: Vec<TagSet> = Vec::new();
    let mut store = Store::with_bound(3);
    let queries = [
        and("0", not("1")),
        or("2", "3"),
        and(or("0", "4"), "5"),
        tag("1"),
    ];

    for round in 0..10 {
        for extra in bernoulli_tag_sets(&mut rng, 25, &universe, 0.35) {
            tags.push(extra.clone());
            store.add(extra, tags.len());
        }
        for q in &queries {
            assert_eq!(run(&store, q).0, naive_find(&tags, q), "round {} {}", round, q);
            assert!(store.check_integrity(), "round {} {}", round, q);
        }
    }
}

// ============================================================================
// Deep overlapping queries
// ============================================================================

#[test]
fn overlapping_deep_queries_keep_integrity() {
    let mut rng = StdRng::seed_from_u64(2024);
    let universe = numbered_tags(10);
    let tags = bernoulli_tag_sets(&mut rng, 2001, &universe, 0.5);

    for bound in [ShortcutBound::Limited(2), ShortcutBound::Unbounded] {
        let store = store_of(&tags, bound);
        let [qa, qb] = overlapping_queries();
        for q in [&qa, &qa, &qb, &qb] {
            let (found, _) = run(&store, q);
            assert_eq!(found, naive_find(&tags, q));
            if let Err(violation) = store.verify_integrity() {
                panic!("{} after {}", violation, q);
            }
        }
    }
}

#[test]
fn partial_scan_leaves_sound_shortcuts() {
    let tags = sparse_tags(30, &[4, 9, 20, 27]);
    let store = store_of(&tags, ShortcutBound::Limited(4));

    let mut scan = store.find(tag("hit"));
    assert_eq!(scan.next(), Some(&4));
    assert_eq!(scan.next(), Some(&9));
    drop(scan);
    assert!(store.check_integrity());

    assert_eq!(run(&store, &tag("hit")).0, vec![4, 9, 20, 27]);
    assert!(store.check_integrity());
}
