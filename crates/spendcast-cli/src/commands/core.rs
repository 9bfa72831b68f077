//! Core command utilities: engine setup, totals loading, config display

use std::path::Path;

use anyhow::{Context, Result};
use spendcast_core::config::ConfigSource;
use spendcast_core::{load_totals, EngineConfig, ForecastEngine, MonthlyCategoryTotal};

use crate::cli::InputArgs;

/// Load the engine config, resolving the override chain
pub fn load_config(config_path: Option<&Path>) -> Result<(EngineConfig, ConfigSource)> {
    EngineConfig::load(config_path).context("Failed to load engine config")
}

/// Build an engine, preferring an explicit artifact over the configured one
pub fn build_engine(mut config: EngineConfig, artifact: Option<&Path>) -> ForecastEngine {
    if let Some(path) = artifact {
        config.forecast.artifact = Some(path.to_path_buf());
    }
    ForecastEngine::from_config(config)
}

/// Load config and build the engine in one step
pub fn open_engine(config_path: Option<&Path>, artifact: Option<&Path>) -> Result<ForecastEngine> {
    let (config, source) = load_config(config_path)?;
    tracing::debug!(source = ?source, "Engine config loaded");
    Ok(build_engine(config, artifact))
}

/// Read the monthly totals named on the command line
pub fn load_input(totals: &Path) -> Result<Vec<MonthlyCategoryTotal>> {
    load_totals(totals).with_context(|| format!("Failed to load totals from {}", totals.display()))
}

/// Engine and totals for commands that take `InputArgs`
pub fn prepare(
    config_path: Option<&Path>,
    input: &InputArgs,
) -> Result<(ForecastEngine, Vec<MonthlyCategoryTotal>)> {
    let engine = open_engine(config_path, input.artifact.as_deref())?;
    let totals = load_input(&input.totals)?;
    Ok((engine, totals))
}

pub fn cmd_config(config_path: Option<&Path>) -> Result<()> {
    let (config, source) = load_config(config_path)?;

    println!();
    println!("⚙️  Engine Configuration");
    match source {
        ConfigSource::Embedded => println!("   Source: built-in defaults"),
        ConfigSource::File(path) => println!("   Source: {}", path.display()),
    }
    println!("   ─────────────────────────────────────────────");
    println!("   Forecast");
    println!("     alpha (level):        {}", config.forecast.alpha);
    println!("     beta (trend):         {}", config.forecast.beta);
    println!("     coverage policy:      {}", config.forecast.coverage_policy);
    println!(
        "     artifact:             {}",
        config
            .forecast
            .artifact
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("   Budget");
    println!(
        "     target savings rate:  {:.0}%",
        config.budget.target_savings_rate * 100.0
    );
    println!(
        "     income window:        {} months",
        config.budget.income_window_months
    );
    println!();

    Ok(())
}
