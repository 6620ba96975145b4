use std::path::PathBuf;

use anyhow::Result;
use mm_core::prelude::{BookEvent, ReplaySimulator};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::cli_config;
use crate::events;
use crate::fill_sink::{FillSink, NullFillSink};
use crate::strategy_factory;

pub struct LiveArgs {
    pub api_key: String,
    pub api_secret: String,
    pub paper: bool,
    pub config_path: Option<PathBuf>,
}

/// Runs the live loop until SIGINT, then issues a cancel-all to the (paper)
/// gateway and exits 0.
///
/// Two cooperative `tokio` tasks drive the core: `ingress` reads book events
/// onto a bounded channel and this task is the sole one that owns and steps
/// the [`ReplaySimulator`], so the synchronous core is never entered
/// reentrantly.
pub async fn run(args: LiveArgs) -> Result<i32> {
    if !args.paper {
        warn!("real exchange connectivity is out of scope for this workspace; use --paper");
        return Ok(1);
    }
    if args.api_key.is_empty() || args.api_secret.is_empty() {
        error!("--api-key and --api-secret are required even in paper mode");
        return Ok(1);
    }

    let config = cli_config::load(args.config_path.as_deref())?;
    let strategy = strategy_factory::build(&config.strategy, None)?;

    let (tx, mut rx) = mpsc::channel::<BookEvent>(256);

    let ingress = tokio::spawn(async move {
        let mut seed = 0u64;
        let mut ts_cursor = 0u64;
        loop {
            let batch = events::synthetic_stream(seed, 32, 10_000, ts_cursor);
            seed = seed.wrapping_add(1);
            if let Some(last) = batch.last() {
                ts_cursor = last.ts();
            }
            for event in batch {
                if tx.send(event).await.is_err() {
                    return;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
    });

    let mut sim = ReplaySimulator::new(strategy, config.mid_price_ring_capacity, config.volatility_window);
    let mut sink = NullFillSink;

    let mut sigint = tokio::signal::ctrl_c();
    tokio::pin!(sigint);

    loop {
        tokio::select! {
            biased;
            _ = &mut sigint => {
                let cancelled = sim.cancel_all();
                info!(count = cancelled.len(), "SIGINT received, cancelled all open quotes");
                break;
            }
            event = rx.recv() => {
                match event {
                    Some(event) => {
                        match sim.step(event) {
                            Ok(outcome) => {
                                for fill in &outcome.fills {
                                    let _ = sink.record(fill);
                                }
                            }
                            Err(e) => {
                                error!(error = %e, "engine error in live loop, disconnecting");
                                break;
                            }
                        }
                    }
                    None => {
                        info!("ingress channel closed, draining and exiting");
                        break;
                    }
                }
            }
        }
    }

    ingress.abort();
    sink.flush()?;
    info!(
        fills = sim.fills().len(),
        inventory = sim.ledger().inventory,
        "live loop exited"
    );
    Ok(0)
}
