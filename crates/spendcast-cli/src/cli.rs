//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Spendcast - Forecast next month's spending and what's safe to spend
#[derive(Parser)]
#[command(name = "spendcast")]
#[command(about = "Monthly spending forecasts and safe-to-spend budgets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine config file (defaults to the user override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments shared by commands that read monthly totals
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Monthly category totals (.csv with month,category,total or .json)
    #[arg(short, long)]
    pub totals: PathBuf,

    /// Pretrained lag-model artifact (overrides the config)
    #[arg(short, long)]
    pub artifact: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Forecast next month's spending per category
    Forecast {
        #[command(flatten)]
        input: InputArgs,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the safe-to-spend budget for next month
    Budget {
        #[command(flatten)]
        input: InputArgs,

        /// Target savings rate (overrides the config, e.g. 0.25)
        #[arg(long)]
        savings_rate: Option<f64>,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show actual spending per month
    History {
        /// Monthly category totals (.csv or .json)
        #[arg(short, long)]
        totals: PathBuf,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print history, forecast and budget as one JSON document
    Report {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Inspect a pretrained artifact
    Artifact {
        /// Artifact file (JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show the effective engine configuration
    Config,
}
