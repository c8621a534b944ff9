//! Subcommand implementations.

use std::time::Instant;

use clap::ArgMatches;
use rand::rngs::StdRng;
use rand::Rng;
use skipscan_core::{Query, ShortcutBound, TagSet};
use skipscan_engine::workload::{
    bernoulli_tag_sets, drawn_tag_sets, numbered_tags, overlapping_queries, random_query,
    AdNetwork,
};
use skipscan_engine::Store;
use skipscan_storage::IntegrityViolation;
use thiserror::Error;
use tracing::info;

/// Errors surfaced to the user
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad shortcut bound
    #[error(transparent)]
    Core(#[from] skipscan_core::Error),
    /// Bad query text
    #[error("Query parse error: {0}")]
    Parse(#[from] skipscan_core::QueryParseError),
    /// A shortcut skipped a matching record
    #[error("Integrity check failed: {0}")]
    Integrity(#[from] IntegrityViolation),
}

type CliResult = Result<(), CliError>;

fn count(matches: &ArgMatches, name: &str) -> usize {
    matches.get_one::<usize>(name).copied().unwrap_or_default()
}

fn bound(matches: &ArgMatches) -> Result<ShortcutBound, CliError> {
    let text = matches.get_one::<String>("bound").map(String::as_str).unwrap_or("8");
    Ok(text.parse()?)
}

fn build_store<V: Clone>(tags: &[TagSet], bound: ShortcutBound, value: V) -> Store<V> {
    let mut store = Store::with_bound(bound);
    store.extend(tags.iter().cloned().map(|t| (t, value.clone())));
    store
}

/// `shortcuts`: bounds 0, 1, 3, 7, ... over random tag sets and queries
pub fn shortcuts(matches: &ArgMatches, rng: &mut StdRng) -> CliResult {
    let records = count(matches, "records");
    let universe = numbered_tags(count(matches, "tags").max(1));
    let per_record = count(matches, "tags-per-record");
    let depth = count(matches, "depth").max(1);
    let cycles = count(matches, "cycles").max(1);
    let max_bound = count(matches, "max-bound");

    let tags = drawn_tag_sets(rng, records, &universe, per_record);
    let queries: Vec<Query> = (0..count(matches, "queries"))
        .map(|_| random_query(rng, depth, &universe))
        .collect();

    println!("bound\tscanned\tresults (total)\ttests\tms/query");
    let mut x = 1;
    while x < max_bound.max(1) + 1 {
        let store = build_store(&tags, ShortcutBound::Limited(x - 1), ());
        let start = Instant::now();
        let (mut results, mut tests, mut runs) = (0usize, 0usize, 0usize);
        for _ in 0..cycles {
            for q in &queries {
                let mut scan = store.find(q);
                results += scan.by_ref().count();
                tests += scan.match_count();
                runs += 1;
            }
        }
        let elapsed = start.elapsed();
        store.verify_integrity()?;

        let per_run = |n: usize| n as f64 / runs.max(1) as f64;
        println!(
            "{}\t{}\t{:.1} ({})\t{:.1}\t{:.3}",
            x - 1,
            records,
            per_run(results),
            results,
            per_run(tests),
            elapsed.as_secs_f64() * 1000.0 / runs.max(1) as f64
        );
        x *= 2;
    }
    Ok(())
}

/// `adnet`: bounds 0..max over an ad-targeting workload
pub fn adnet(matches: &ArgMatches, rng: &mut StdRng) -> CliResult {
    let ads = count(matches, "ads");
    let queries = count(matches, "queries");
    let net = AdNetwork {
        locations: count(matches, "locations").max(1),
        categories: count(matches, "categories").max(1),
    };

    println!("bound\tresults\ttests\ttested fraction");
    for b in 0..count(matches, "max-bound") {
        let tags: Vec<TagSet> = (0..ads).map(|_| net.ad_tags(rng)).collect();
        let store = build_store(&tags, ShortcutBound::Limited(b), ());

        let (mut results, mut tests) = (0usize, 0usize);
        for _ in 0..queries {
            let mut scan = store.find(net.query(rng));
            results += scan.by_ref().count();
            tests += scan.match_count();
        }
        store.verify_integrity()?;

        let fraction = tests as f64 / (queries * ads).max(1) as f64;
        println!("{}\t{}\t{}\t{:.4}", b, results, tests, fraction);
    }
    Ok(())
}

/// `integrity`: two overlapping queries, each run twice, verified after each
pub fn integrity(matches: &ArgMatches, rng: &mut StdRng) -> CliResult {
    let universe = numbered_tags(count(matches, "tags"));
    let probability = matches.get_one::<f64>("probability").copied().unwrap_or(0.1);
    let tags = bernoulli_tag_sets(rng, count(matches, "records"), &universe, probability);

    // Values are the records' own tags
    let mut store = Store::with_bound(bound(matches)?);
    store.extend(tags.into_iter().map(|t| (t.clone(), t)));

    let [qa, qb] = overlapping_queries();
    for q in [&qa, &qa, &qb, &qb] {
        let mut scan = store.find(q);
        let found = scan.by_ref().count();
        println!(
            "Query: {}, found {} results with {} tests, shortcut count: {}",
            q,
            found,
            scan.match_count(),
            store.shortcut_count()
        );
        store.verify_integrity()?;
    }
    info!(target: "skipscan::cli", "Integrity verified");
    println!("Integrity OK");
    Ok(())
}

/// `query`: one parsed query, run repeatedly, with per-run stats
pub fn query(matches: &ArgMatches, rng: &mut StdRng) -> CliResult {
    let text = matches.get_one::<String>("query").map(String::as_str).unwrap_or_default();
    let query: Query = text.parse()?;
    let bound = bound(matches)?;
    let universe = numbered_tags(count(matches, "tags").max(1));
    let records = count(matches, "records");
    let tags = drawn_tag_sets(rng, records, &universe, count(matches, "tags-per-record"));
    let store = build_store(&tags, bound, ());

    println!("Query: {}", query);
    println!("run\tresults\ttests\tskips\tshortcuts written\tms");
    for run in 1..=count(matches, "repeat") {
        let start = Instant::now();
        let mut scan = store.find(&query);
        let results = scan.by_ref().count();
        let stats = scan.stats();
        println!(
            "{}\t{}\t{}\t{}\t{}\t{:.3}",
            run,
            results,
            stats.match_count,
            stats.skips_taken,
            stats.shortcuts_written,
            start.elapsed().as_secs_f64() * 1000.0
        );
    }
    store.verify_integrity()?;
    println!("shortcut count: {}", store.shortcut_count());
    Ok(())
}

/// Seeded RNG, or a fresh random seed
pub fn rng_from(seed: Option<u64>) -> (StdRng, u64) {
    use rand::SeedableRng;
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    (StdRng::seed_from_u64(seed), seed)
}
