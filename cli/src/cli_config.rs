use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mm_core::config::{Config, EvConfig, NaiveConfig, StrategyConfig};

/// Loads [`Config`] layered as defaults -> TOML file (if present) -> env
/// overrides, the order the core's own doc comment prescribes.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();

    if let Some(path) = path {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        config = toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))?;
    }

    apply_env_overrides(&mut config);
    Ok(config)
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(v) = env::var("MM_TICK_SIZE") {
        config.tick_size = v;
    }
    if let Some(v) = env_parsed("MM_MID_PRICE_RING_CAPACITY") {
        config.mid_price_ring_capacity = v;
    }
    if let Some(v) = env_parsed("MM_VOLATILITY_WINDOW") {
        config.volatility_window = v;
    }
    if let Some(v) = env_parsed("MM_DEPTH_LEVELS") {
        config.depth_levels = v;
    }
    if let Ok(name) = env::var("MM_STRATEGY") {
        match name.as_str() {
            "naive" => {
                if !matches!(config.strategy, StrategyConfig::Naive(_)) {
                    config.strategy = StrategyConfig::Naive(NaiveConfig::default());
                }
            }
            "ev" => {
                if !matches!(config.strategy, StrategyConfig::Ev(_)) {
                    config.strategy = StrategyConfig::Ev(EvConfig::default());
                }
            }
            other => {
                tracing::warn!(strategy = other, "unrecognized MM_STRATEGY, ignoring");
            }
        }
    }
    if let StrategyConfig::Naive(ref mut naive) = config.strategy {
        if let Some(v) = env_parsed("MM_NAIVE_SPREAD_TICKS") {
            naive.spread_ticks = v;
        }
        if let Some(v) = env_parsed("MM_NAIVE_SIZE_TICKS") {
            naive.size_ticks = v;
        }
    }
    if let StrategyConfig::Ev(ref mut ev) = config.strategy {
        if let Some(v) = env_parsed("MM_EV_MAX_HALF_SPREAD_TICKS") {
            ev.max_half_spread_ticks = v;
        }
        if let Some(v) = env_parsed("MM_EV_SKEW_K") {
            ev.skew_k = v;
        }
        if let Ok(v) = env::var("MM_EV_FILL_PROB_TABLE_PATH") {
            ev.fill_prob_table_path = v;
        }
    }
}
