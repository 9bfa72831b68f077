//! Spendcast CLI - monthly spending forecasts
//!
//! Usage:
//!   spendcast forecast --totals totals.csv     Forecast next month
//!   spendcast budget --totals totals.csv       Safe-to-spend budget
//!   spendcast history --totals totals.csv      Monthly actuals
//!   spendcast report --totals totals.csv       Everything as JSON

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Forecast { input, json } => commands::cmd_forecast(config_path, &input, json),
        Commands::Budget {
            input,
            savings_rate,
            json,
        } => commands::cmd_budget(config_path, &input, savings_rate, json),
        Commands::History { totals, json } => commands::cmd_history(&totals, json),
        Commands::Report { input } => commands::cmd_report(config_path, &input),
        Commands::Artifact { file } => commands::cmd_artifact(&file),
        Commands::Config => commands::cmd_config(config_path),
    }
}
