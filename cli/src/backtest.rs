use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use mm_core::error::{ProtocolError, ReplayError};
use mm_core::prelude::ReplaySimulator;
use tracing::{error, info};

use crate::cli_config;
use crate::events;
use crate::fill_sink::{FillSink, NdjsonFillSink};
use crate::strategy_factory;

pub struct BacktestArgs {
    pub date: String,
    pub symbol: String,
    pub strategy: Option<String>,
    pub config_path: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
}

/// Exit codes: 0 on completion, 2 when a recorded log exists but is empty,
/// 1 on a [`mm_core::error::EngineFault`] or any other unrecoverable error.
/// A missing log is not an error: the run falls back to a synthesized paper
/// stream.
pub fn run(args: BacktestArgs) -> Result<i32> {
    let mut config = cli_config::load(args.config_path.as_deref())?;
    if let Some(name) = &args.strategy {
        apply_strategy_override(&mut config, name)?;
    }

    let config_dir = args.config_path.as_deref().and_then(Path::parent).map(Path::to_path_buf);
    let strategy = strategy_factory::build(&config.strategy, config_dir.as_deref())?;

    let log_path = args.data_dir.join(format!("{}-{}.jsonl", args.symbol, args.date));
    let events = match events::load_recorded_stream(&log_path)? {
        Some(events) if !events.is_empty() => {
            info!(path = %log_path.display(), count = events.len(), "loaded recorded event log");
            events
        }
        Some(_) => {
            error!(path = %log_path.display(), "recorded event log is empty");
            return Ok(2);
        }
        None => {
            let seed = synthetic_seed(&args.symbol, &args.date);
            let synthesized = events::synthetic_stream(seed, 5_000, 10_000, 0);
            info!(
                path = %log_path.display(),
                symbol = %args.symbol,
                date = %args.date,
                seed,
                count = synthesized.len(),
                "no recorded event log found; synthesizing a paper event stream"
            );
            synthesized
        }
    };

    std::fs::create_dir_all(&args.out_dir)?;
    let fill_log_path = args.out_dir.join(format!("{}-{}-fills.jsonl", args.symbol, args.date));
    let mut sink = NdjsonFillSink::create(&fill_log_path)?;

    let mut sim = ReplaySimulator::new(strategy, config.mid_price_ring_capacity, config.volatility_window);

    let run_result = sim.run(events);
    for fill in sim.fills() {
        sink.record(fill)?;
    }
    sink.flush()?;

    match run_result {
        Ok(()) => {
            info!(
                fills = sim.fills().len(),
                inventory = sim.ledger().inventory,
                realized_pnl = sim.ledger().realized_pnl as i64,
                fill_log = %fill_log_path.display(),
                "backtest complete"
            );
            Ok(0)
        }
        Err(ReplayError::Protocol(ProtocolError::OutOfOrder { ts, last_ts })) => {
            error!(ts, last_ts, "backtest aborted: out-of-order event");
            Ok(1)
        }
        Err(ReplayError::Protocol(e)) => {
            error!(error = %e, "backtest aborted: protocol error");
            Ok(1)
        }
        Err(ReplayError::Fault(fault)) => {
            error!(error = %fault, "backtest aborted: engine fault");
            Ok(1)
        }
    }
}

/// Deterministic per (symbol, date) seed so repeated backtests against the
/// same missing log synthesize the same stream; `DefaultHasher` uses fixed
/// keys, not the randomized `RandomState` `HashMap` seeds with.
fn synthetic_seed(symbol: &str, date: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    symbol.hash(&mut hasher);
    date.hash(&mut hasher);
    hasher.finish()
}

fn apply_strategy_override(config: &mut mm_core::config::Config, name: &str) -> Result<()> {
    use mm_core::config::{EvConfig, NaiveConfig, StrategyConfig};
    config.strategy = match name {
        "naive" => StrategyConfig::Naive(NaiveConfig::default()),
        "ev" => StrategyConfig::Ev(EvConfig::default()),
        other => bail!("unknown --strategy {other:?}, expected \"naive\" or \"ev\""),
    };
    Ok(())
}
