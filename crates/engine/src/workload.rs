//! Synthetic workloads
//!
//! Seeded generators for tag sets and queries, shared by the CLI, the
//! benchmarks and the tests. All generators take the RNG explicitly so a
//! fixed seed reproduces a run exactly.

use rand::Rng;
use skipscan_core::{and, not, or, Query, Tag, TagSet};

/// Tag names `"0"`, `"1"`, ... `"count - 1"`
pub fn numbered_tags(count: usize) -> Vec<Tag> {
    (0..count).map(|i| i.to_string()).collect()
}

/// `count` tag sets, each built from `draws` uniform draws (with
/// replacement) from `universe`
pub fn drawn_tag_sets<R: Rng>(
    rng: &mut R,
    count: usize,
    universe: &[Tag],
    draws: usize,
) -> Vec<TagSet> {
    (0..count)
        .map(|_| {
            (0..draws)
                .map(|_| universe[rng.gen_range(0..universe.len())].clone())
                .collect()
        })
        .collect()
}

/// `count` tag sets, each tag in `universe` included independently with
/// `probability`
pub fn bernoulli_tag_sets<R: Rng>(
    rng: &mut R,
    count: usize,
    universe: &[Tag],
    probability: f64,
) -> Vec<TagSet> {
    (0..count)
        .map(|_| {
            universe
                .iter()
                .filter(|_| rng.gen::<f64>() < probability)
                .cloned()
                .collect()
        })
        .collect()
}

/// Random query tree no deeper than `max_depth`
///
/// Interior nodes are `And` five times in eight, `Or`, `Not` and an early
/// leaf once in eight each.
pub fn random_query<R: Rng>(rng: &mut R, max_depth: usize, universe: &[Tag]) -> Query {
    let leaf = |rng: &mut R| Query::tag(universe[rng.gen_range(0..universe.len())].clone());

    if max_depth <= 1 {
        return leaf(rng);
    }
    match rng.gen_range(0..8) {
        0..=4 => and(
            random_query(rng, max_depth - 1, universe),
            random_query(rng, max_depth - 1, universe),
        ),
        5 => or(
            random_query(rng, max_depth - 1, universe),
            random_query(rng, max_depth - 1, universe),
        ),
        6 => not(random_query(rng, max_depth - 1, universe)),
        _ => leaf(rng),
    }
}

/// Two deep, overlapping queries over numbered tags
///
/// They share conjuncts, so running one teaches shortcuts the other can use.
pub fn overlapping_queries() -> [Query; 2] {
    [
        and(
            "1",
            and(
                and(and("3", "2"), not("6")),
                not(and(not("3"), and("1", "6"))),
            ),
        ),
        and(
            "3",
            and(
                and(and("3", "2"), not("6")),
                not(and(not("3"), and("1", "4"))),
            ),
        ),
    ]
}

/// Ad-serving workload: ads tagged with a location, a category and an adult
/// flag, queried by targeting rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdNetwork {
    /// Distinct `loc:` tags
    pub locations: usize,
    /// Distinct `cat:` tags
    pub categories: usize,
}

impl Default for AdNetwork {
    fn default() -> Self {
        AdNetwork {
            locations: 100,
            categories: 10,
        }
    }
}

impl AdNetwork {
    fn location<R: Rng>(&self, rng: &mut R) -> String {
        format!("loc:{}", rng.gen_range(0..self.locations))
    }

    fn category<R: Rng>(&self, rng: &mut R) -> String {
        format!("cat:{}", rng.gen_range(0..self.categories))
    }

    fn adult<R: Rng>(&self, rng: &mut R) -> String {
        format!("adult:{}", rng.gen_bool(0.5))
    }

    /// Tags for one ad
    pub fn ad_tags<R: Rng>(&self, rng: &mut R) -> TagSet {
        [self.location(rng), self.category(rng), self.adult(rng)]
            .into_iter()
            .collect()
    }

    /// One targeting rule, picked uniformly from three shapes:
    ///
    /// - `loc AND (cat AND adult)`
    /// - `(loc OR loc) AND (cat AND adult)`
    /// - `(loc OR loc) AND ((cat AND adult) OR (cat AND adult))`
    pub fn query<R: Rng>(&self, rng: &mut R) -> Query {
        match rng.gen_range(0..3) {
            0 => and(
                self.location(rng),
                and(self.category(rng), self.adult(rng)),
            ),
            1 => and(
                or(self.location(rng), self.location(rng)),
                and(self.category(rng), self.adult(rng)),
            ),
            _ => and(
                or(self.location(rng), self.location(rng)),
                or(
                    and(self.category(rng), self.adult(rng)),
                    and(self.category(rng), self.adult(rng)),
                ),
            ),
        }
    }
}
