use clap::Parser;

#[path = "../src/cli_args.rs"]
mod cli_args;

use cli_args::{Cli, Commands};

#[test]
fn parses_backtest_subcommand_with_defaults() {
    let cli = Cli::try_parse_from(["marketmaker", "backtest", "--date", "2026-07-01"])
        .unwrap_or_else(|e| panic!("parse failed: {e}"));
    match cli.command {
        Commands::Backtest {
            date,
            symbol,
            strategy,
            data_dir,
            out_dir,
        } => {
            assert_eq!(date, "2026-07-01");
            assert_eq!(symbol, "BTC-USD");
            assert_eq!(strategy, None);
            assert_eq!(data_dir.to_str(), Some("data"));
            assert_eq!(out_dir.to_str(), Some("out"));
        }
        _ => panic!("expected Backtest"),
    }
}

#[test]
fn backtest_requires_a_date() {
    let result = Cli::try_parse_from(["marketmaker", "backtest"]);
    assert!(result.is_err());
}

#[test]
fn backtest_rejects_unknown_strategy_names() {
    let result = Cli::try_parse_from([
        "marketmaker",
        "backtest",
        "--date",
        "2026-07-01",
        "--strategy",
        "bogus",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_live_subcommand_with_paper_flag() {
    let cli = Cli::try_parse_from([
        "marketmaker",
        "live",
        "--api-key",
        "k",
        "--api-secret",
        "s",
        "--paper",
    ])
    .unwrap_or_else(|e| panic!("parse failed: {e}"));
    match cli.command {
        Commands::Live {
            api_key,
            api_secret,
            paper,
        } => {
            assert_eq!(api_key, "k");
            assert_eq!(api_secret, "s");
            assert!(paper);
        }
        _ => panic!("expected Live"),
    }
}

#[test]
fn global_config_flag_is_available_before_or_after_subcommand() {
    let cli = Cli::try_parse_from(["marketmaker", "--config", "mm.toml", "backtest", "--date", "2026-07-01"])
        .unwrap_or_else(|e| panic!("parse failed: {e}"));
    assert_eq!(cli.config.as_deref().and_then(|p| p.to_str()), Some("mm.toml"));
}
