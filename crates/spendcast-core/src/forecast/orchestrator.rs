//! Forecast path selection
//!
//! Chooses between naive persistence, the pretrained lag models and the Holt
//! smoother, then labels the result with the month being forecast.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ForecastConfig;
use crate::models::{
    finite_or_zero, is_income, resolve_income_category, CategoryForecast, CategorySeries,
    ForecastMethod, ForecastResult,
};
use crate::month::next_month_key;

use super::holt::HoltSmoother;
use super::pretrained::{LagModelPredictor, PretrainedArtifact};

/// Distinct months required before trend models are trusted
pub const MIN_MONTHS_FOR_MODELS: usize = 2;

/// How to treat categories the pretrained artifact has no model for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoveragePolicy {
    /// Use the pretrained predictions as they are; uncovered categories are
    /// left out of the forecast
    #[default]
    Verbatim,
    /// Fill uncovered categories from the Holt smoother
    BackfillHolt,
}

impl CoveragePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoveragePolicy::Verbatim => "verbatim",
            CoveragePolicy::BackfillHolt => "backfill_holt",
        }
    }

    /// Combine pretrained predictions with the series they were made from
    fn apply(
        &self,
        pretrained: Vec<CategoryForecast>,
        series: &[CategorySeries],
        holt: &HoltSmoother,
        next_index: usize,
    ) -> Vec<CategoryForecast> {
        match self {
            CoveragePolicy::Verbatim => pretrained,
            CoveragePolicy::BackfillHolt => series
                .iter()
                .filter(|s| !is_income(&s.category))
                .map(|s| {
                    pretrained
                        .iter()
                        .find(|p| p.category == s.category)
                        .cloned()
                        .unwrap_or_else(|| CategoryForecast {
                            category: s.category.clone(),
                            predicted: finite_or_zero(
                                holt.forecast_series(s, next_index),
                                &s.category,
                            ),
                        })
                })
                .collect(),
        }
    }
}

impl fmt::Display for CoveragePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CoveragePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verbatim" => Ok(CoveragePolicy::Verbatim),
            "backfill_holt" => Ok(CoveragePolicy::BackfillHolt),
            _ => Err(format!("Unknown coverage policy: {}", s)),
        }
    }
}

/// Selects and runs a prediction path for a set of category series
pub struct ForecastOrchestrator<'a> {
    holt: HoltSmoother,
    policy: CoveragePolicy,
    artifact: Option<&'a PretrainedArtifact>,
}

impl<'a> ForecastOrchestrator<'a> {
    pub fn new(config: &ForecastConfig, artifact: Option<&'a PretrainedArtifact>) -> Self {
        Self {
            holt: HoltSmoother::from_config(config),
            policy: config.coverage_policy,
            artifact,
        }
    }

    /// Forecast the month after the latest observation
    ///
    /// Returns `None` when the series hold no observations at all. With fewer
    /// than two distinct months every category repeats its latest amount.
    /// Otherwise pretrained predictions are used when they produce anything,
    /// and the Holt smoother runs for every non-Income category when they
    /// don't.
    pub fn forecast(&self, series: &[CategorySeries]) -> Option<ForecastResult> {
        let months: BTreeSet<&str> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.month_key.as_str()))
            .collect();
        let last_month = *months.last()?;

        let next_month = next_month_key(last_month).unwrap_or_else(|| {
            tracing::warn!(
                month = last_month,
                "Unparseable month key, reusing it as forecast label"
            );
            last_month.to_string()
        });
        let next_index = months.len();
        let spending = spending_series(series);

        let (method, categories) = if months.len() < MIN_MONTHS_FOR_MODELS {
            (ForecastMethod::NaivePersistence, self.naive(&spending))
        } else {
            match LagModelPredictor::new(self.artifact).predict(&spending) {
                Some(pretrained) if !pretrained.is_empty() => (
                    ForecastMethod::Pretrained,
                    self.policy.apply(pretrained, &spending, &self.holt, next_index),
                ),
                _ => (ForecastMethod::Holt, self.smoothed(&spending, next_index)),
            }
        };

        let model_version = match method {
            ForecastMethod::Pretrained => self.artifact.map(|a| a.version.clone()),
            _ => None,
        };

        let total_predicted = finite_or_zero(
            categories.iter().map(|c| c.predicted.max(0.0)).sum(),
            "total",
        );

        tracing::debug!(
            method = method.as_str(),
            months = months.len(),
            categories = categories.len(),
            next_month = %next_month,
            "Forecast complete"
        );

        Some(ForecastResult {
            next_month_key: next_month,
            method,
            model_version,
            categories,
            total_predicted,
        })
    }

    /// Latest observed amount per category (0 for empty series)
    fn naive(&self, series: &[CategorySeries]) -> Vec<CategoryForecast> {
        series
            .iter()
            .filter(|s| !is_income(&s.category))
            .map(|s| CategoryForecast {
                category: s.category.clone(),
                predicted: s.latest().map(|p| p.amount).unwrap_or(0.0),
            })
            .collect()
    }

    fn smoothed(&self, series: &[CategorySeries], next_index: usize) -> Vec<CategoryForecast> {
        series
            .iter()
            .filter(|s| !is_income(&s.category))
            .map(|s| CategoryForecast {
                category: s.category.clone(),
                predicted: finite_or_zero(self.holt.forecast_series(s, next_index), &s.category),
            })
            .collect()
    }
}

/// Series that count as spending: everything but Income and the resolved
/// income source
fn spending_series(series: &[CategorySeries]) -> Vec<CategorySeries> {
    let income = resolve_income_category(
        series
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.category.as_str()),
    );
    series
        .iter()
        .filter(|s| !is_income(&s.category) && Some(s.category.as_str()) != income)
        .cloned()
        .collect()
}
