use serde::{Deserialize, Serialize};

/// Strategy selection and its tunable parameters, layered by the CLI
/// collaborator as defaults -> TOML file -> environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyConfig {
    Naive(NaiveConfig),
    Ev(EvConfig),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveConfig {
    pub spread_ticks: i64,
    pub size_ticks: i64,
}

impl Default for NaiveConfig {
    fn default() -> Self {
        NaiveConfig {
            spread_ticks: 2,
            size_ticks: 100_000_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvConfig {
    pub max_half_spread_ticks: i64,
    pub skew_k: f64,
    pub base_size_ticks: i64,
    pub fill_prob_table_path: String,
}

impl Default for EvConfig {
    fn default() -> Self {
        EvConfig {
            max_half_spread_ticks: 20,
            skew_k: 0.05,
            base_size_ticks: 100_000_000,
            fill_prob_table_path: "fill_prob_table.json".to_string(),
        }
    }
}

/// Top-level, venue- and observability-agnostic configuration for the core.
/// The CLI collaborator owns reading this from disk/env; the core only
/// defines its shape and sane defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tick size of the venue, expressed in quote-currency units.
    pub tick_size: String,
    /// Capacity of the mid-price ring used by the feature extractor.
    pub mid_price_ring_capacity: usize,
    /// Window (in samples) over which volatility is computed.
    pub volatility_window: usize,
    /// Number of top-of-book levels the imbalance feature looks at by
    /// default (the extractor itself always reports n in {1, 2, 5}).
    pub depth_levels: usize,
    pub strategy: StrategyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tick_size: "0.01".to_string(),
            mid_price_ring_capacity: 512,
            volatility_window: 64,
            depth_levels: 5,
            strategy: StrategyConfig::Naive(NaiveConfig::default()),
        }
    }
}
