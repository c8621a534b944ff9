//! Clap command tree definition.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("skipscan")
        .about("Benchmarks and diagnostics for the SkipScan tagged record store")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("RNG seed (default: random)")
                .value_parser(value_parser!(u64))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log scan and integrity events (repeat for more)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(build_shortcuts())
        .subcommand(build_adnet())
        .subcommand(build_integrity())
        .subcommand(build_query())
}

fn count_arg(name: &'static str, help: &'static str, default: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_parser(value_parser!(usize))
        .default_value(default)
}

fn build_shortcuts() -> Command {
    Command::new("shortcuts")
        .about("Sweep shortcut bounds over random tag sets and random queries")
        .arg(count_arg("records", "Records in the store", "100000"))
        .arg(count_arg("tags", "Distinct tags", "50"))
        .arg(count_arg("tags-per-record", "Tag draws per record", "10"))
        .arg(count_arg("queries", "Distinct queries", "100"))
        .arg(count_arg("depth", "Maximum query depth", "7"))
        .arg(count_arg("cycles", "Passes over the query list", "2"))
        .arg(count_arg("max-bound", "Sweep bounds 0, 1, 3, 7, ... below this", "100"))
}

fn build_adnet() -> Command {
    Command::new("adnet")
        .about("Sweep shortcut bounds over an ad-targeting workload")
        .arg(count_arg("ads", "Ads in the store", "5000"))
        .arg(count_arg("locations", "Distinct locations", "100"))
        .arg(count_arg("categories", "Distinct categories", "10"))
        .arg(count_arg("queries", "Targeting queries per bound", "5000"))
        .arg(count_arg("max-bound", "Sweep bounds 0..max-bound", "30"))
}

fn build_integrity() -> Command {
    Command::new("integrity")
        .about("Run overlapping deep queries and verify shortcut integrity after each")
        .arg(count_arg("records", "Records in the store", "10001"))
        .arg(count_arg("tags", "Distinct tags", "100"))
        .arg(
            Arg::new("probability")
                .long("probability")
                .help("Chance each tag is attached to a record")
                .value_parser(value_parser!(f64))
                .default_value("0.1"),
        )
        .arg(
            Arg::new("bound")
                .long("bound")
                .help("Shortcut bound: an integer or \"unbounded\"")
                .default_value("2"),
        )
}

fn build_query() -> Command {
    Command::new("query")
        .about("Run one query repeatedly over random tag sets")
        .arg(
            Arg::new("query")
                .help("Query text, e.g. '3 & (7 | !12)'")
                .required(true),
        )
        .arg(count_arg("records", "Records in the store", "100000"))
        .arg(count_arg("tags", "Distinct tags", "50"))
        .arg(count_arg("tags-per-record", "Tag draws per record", "10"))
        .arg(count_arg("repeat", "Times to run the query", "3"))
        .arg(
            Arg::new("bound")
                .long("bound")
                .help("Shortcut bound: an integer or \"unbounded\"")
                .default_value("8"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_query_subcommand_defaults() {
        let matches = build_cli()
            .try_get_matches_from(["skipscan", "query", "a & b", "--seed", "4"])
            .unwrap();
        assert_eq!(matches.get_one::<u64>("seed"), Some(&4));
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "query");
        assert_eq!(sub.get_one::<String>("query").map(String::as_str), Some("a & b"));
        assert_eq!(sub.get_one::<usize>("repeat"), Some(&3));
        assert_eq!(sub.get_one::<String>("bound").map(String::as_str), Some("8"));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(build_cli().try_get_matches_from(["skipscan"]).is_err());
    }
}
