//! SkipScan CLI: workload benchmarks and integrity diagnostics.
//!
//! - `skipscan shortcuts` sweeps shortcut bounds over random queries
//! - `skipscan adnet` sweeps bounds over an ad-targeting workload
//! - `skipscan integrity` runs overlapping queries and verifies shortcuts
//! - `skipscan query TEXT` runs one query repeatedly and reports per-run stats

mod commands;
mod run;

use std::process;

use tracing_subscriber::EnvFilter;

use commands::build_cli;

fn main() {
    let cli = build_cli();
    let matches = cli.get_matches();

    let level = match matches.get_count("verbose") {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let (mut rng, seed) = run::rng_from(matches.get_one::<u64>("seed").copied());
    eprintln!("seed: {}", seed);

    let result = match matches.subcommand() {
        Some(("shortcuts", sub)) => run::shortcuts(sub, &mut rng),
        Some(("adnet", sub)) => run::adnet(sub, &mut rng),
        Some(("integrity", sub)) => run::integrity(sub, &mut rng),
        Some(("query", sub)) => run::query(sub, &mut rng),
        _ => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("(error) {}", e);
        process::exit(1);
    }
}
