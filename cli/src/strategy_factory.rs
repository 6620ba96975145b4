use std::path::Path;

use anyhow::Result;
use mm_core::config::StrategyConfig;
use mm_core::strategy::{EvStrategy, NaiveStrategy, Strategy};
use mm_core::types::Quantity;

use crate::fill_prob;

/// Builds the configured [`Strategy`] as a trait object so `backtest`/`live`
/// can drive either reference strategy through one `ReplaySimulator`
/// instantiation without a generic parameter at the CLI boundary.
pub fn build(strategy_config: &StrategyConfig, config_dir: Option<&Path>) -> Result<Box<dyn Strategy + Send>> {
    match strategy_config {
        StrategyConfig::Naive(naive) => Ok(Box::new(NaiveStrategy::new(
            naive.spread_ticks,
            Quantity(naive.size_ticks),
        ))),
        StrategyConfig::Ev(ev) => {
            let table_path = resolve_table_path(&ev.fill_prob_table_path, config_dir);
            let table = fill_prob::load(&table_path)?;
            let base_size = Quantity(ev.base_size_ticks);
            Ok(Box::new(EvStrategy::new(
                ev.max_half_spread_ticks,
                ev.skew_k,
                table,
                move |_inventory| base_size,
            )))
        }
    }
}

fn resolve_table_path(configured: &str, config_dir: Option<&Path>) -> std::path::PathBuf {
    let path = Path::new(configured);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match config_dir {
        Some(dir) => dir.join(path),
        None => path.to_path_buf(),
    }
}
