//! Engine configuration
//!
//! Holds the tunable constants of the forecasting and allocation engine:
//! Holt smoothing weights, the pretrained coverage policy, the optional
//! artifact path, the savings rate and the income averaging window.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override (explicit path, else ~/.local/share/spendcast/config/engine.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::forecast::CoveragePolicy;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// Holt level weight used when nothing else is configured
pub const DEFAULT_ALPHA: f64 = 0.6;
/// Holt trend weight used when nothing else is configured
pub const DEFAULT_BETA: f64 = 0.3;
/// Share of income set aside before budgeting
pub const DEFAULT_TARGET_SAVINGS_RATE: f64 = 0.2;
/// Trailing income months averaged for the budget
pub const DEFAULT_INCOME_WINDOW_MONTHS: usize = 3;

/// Forecasting settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastConfig {
    /// Holt level smoothing weight
    pub alpha: f64,
    /// Holt trend smoothing weight
    pub beta: f64,
    /// How partial pretrained coverage is resolved
    pub coverage_policy: CoveragePolicy,
    /// Pretrained artifact location, if any
    pub artifact: Option<PathBuf>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            coverage_policy: CoveragePolicy::default(),
            artifact: None,
        }
    }
}

/// Safe-to-spend settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetConfig {
    pub target_savings_rate: f64,
    pub income_window_months: usize,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            target_savings_rate: DEFAULT_TARGET_SAVINGS_RATE,
            income_window_months: DEFAULT_INCOME_WINDOW_MONTHS,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngineConfig {
    pub forecast: ForecastConfig,
    pub budget: BudgetConfig,
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Defaults compiled into the binary
    Embedded,
    /// Override file on disk
    File(PathBuf),
}

impl EngineConfig {
    /// Load config: explicit path, then user override, then embedded defaults
    ///
    /// A missing explicit path falls through to the embedded defaults, the
    /// same as a missing user override. An override that exists but cannot be
    /// read or parsed is an error.
    pub fn load(override_path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let candidate = match override_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };

        if let Some(path) = candidate.filter(|p| p.exists()) {
            let content = fs::read_to_string(&path)?;
            let config = parse_config(&content)?;
            tracing::debug!(path = %path.display(), "Loaded engine config override");
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((parse_config(DEFAULT_CONFIG)?, ConfigSource::Embedded))
    }

    /// Parse config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let f = &self.forecast;
        if !(f.alpha > 0.0 && f.alpha <= 1.0) {
            return Err(Error::InvalidData(format!(
                "forecast.alpha must be in (0, 1], got {}",
                f.alpha
            )));
        }
        if !(f.beta > 0.0 && f.beta <= 1.0) {
            return Err(Error::InvalidData(format!(
                "forecast.beta must be in (0, 1], got {}",
                f.beta
            )));
        }

        let b = &self.budget;
        if !(b.target_savings_rate >= 0.0 && b.target_savings_rate < 1.0) {
            return Err(Error::InvalidData(format!(
                "budget.target_savings_rate must be in [0, 1), got {}",
                b.target_savings_rate
            )));
        }
        if b.income_window_months == 0 {
            return Err(Error::InvalidData(
                "budget.income_window_months must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendcast").join("config").join("engine.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    forecast: Option<RawForecast>,
    budget: Option<RawBudget>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    alpha: Option<f64>,
    beta: Option<f64>,
    coverage_policy: Option<String>,
    artifact: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawBudget {
    target_savings_rate: Option<f64>,
    income_window_months: Option<usize>,
}

/// Parse config from TOML content, layering it over the defaults
fn parse_config(content: &str) -> Result<EngineConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let mut config = EngineConfig::default();

    if let Some(forecast) = raw.forecast {
        if let Some(alpha) = forecast.alpha {
            config.forecast.alpha = alpha;
        }
        if let Some(beta) = forecast.beta {
            config.forecast.beta = beta;
        }
        if let Some(policy) = forecast.coverage_policy {
            config.forecast.coverage_policy =
                policy.parse().map_err(Error::InvalidData)?;
        }
        if forecast.artifact.is_some() {
            config.forecast.artifact = forecast.artifact;
        }
    }

    if let Some(budget) = raw.budget {
        if let Some(rate) = budget.target_savings_rate {
            config.budget.target_savings_rate = rate;
        }
        if let Some(window) = budget.income_window_months {
            config.budget.income_window_months = window;
        }
    }

    config.validate()?;
    Ok(config)
}
