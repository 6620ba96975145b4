use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "marketmaker", about = "Backtest and paper-run a market-making strategy")]
pub struct Cli {
    /// Path to a TOML config file layered over the built-in defaults.
    #[arg(long, global = true, env = "MM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a recorded (or synthesized) day of book events against a strategy.
    Backtest {
        /// Date of the recorded log to replay, `YYYY-MM-DD`.
        #[arg(long)]
        date: String,
        /// Instrument symbol the recorded log is keyed on.
        #[arg(long, default_value = "BTC-USD")]
        symbol: String,
        /// Overrides the configured strategy for this run.
        #[arg(long, value_parser = ["naive", "ev"])]
        strategy: Option<String>,
        /// Directory recorded event logs are read from.
        #[arg(long, default_value = "data", env = "MM_DATA_DIR")]
        data_dir: PathBuf,
        /// Directory the fill log and summary are written to.
        #[arg(long, default_value = "out", env = "MM_OUT_DIR")]
        out_dir: PathBuf,
    },
    /// Run the live cooperative loop against the exchange gateway.
    Live {
        #[arg(long, env = "MM_API_KEY", default_value = "")]
        api_key: String,
        #[arg(long, env = "MM_API_SECRET", default_value = "")]
        api_secret: String,
        /// Run against a synthetic paper feed instead of a real exchange
        /// connection (required: real connectivity is out of scope here).
        #[arg(long)]
        paper: bool,
    },
}
