mod backtest;
mod cli_args;
mod cli_config;
mod events;
mod fill_prob;
mod fill_sink;
mod live;
mod strategy_factory;

use std::process::ExitCode;

use clap::Parser;
use cli_args::{Cli, Commands};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "marketmaker=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Backtest {
            date,
            symbol,
            strategy,
            data_dir,
            out_dir,
        } => {
            let args = backtest::BacktestArgs {
                date,
                symbol,
                strategy,
                config_path: cli.config,
                data_dir,
                out_dir,
            };
            match backtest::run(args) {
                Ok(code) => code,
                Err(e) => {
                    tracing::error!(error = %e, "backtest failed");
                    1
                }
            }
        }
        Commands::Live {
            api_key,
            api_secret,
            paper,
        } => {
            let args = live::LiveArgs {
                api_key,
                api_secret,
                paper,
                config_path: cli.config,
            };
            match live::run(args).await {
                Ok(code) => code,
                Err(e) => {
                    tracing::error!(error = %e, "live loop failed");
                    1
                }
            }
        }
    };

    ExitCode::from(exit_code as u8)
}
