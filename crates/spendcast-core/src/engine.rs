//! Forecast Engine - runs forecasting, allocation and history over a snapshot
//!
//! The engine owns its configuration and (optional) pretrained artifact and
//! never mutates them, so one engine can serve any number of callers. Every
//! method is a pure function of the totals passed in.

use crate::budget::SafeToSpendAllocator;
use crate::config::EngineConfig;
use crate::forecast::{
    build_category_series, load_artifact, ForecastOrchestrator, PretrainedArtifact,
};
use crate::history::build_history;
use crate::models::{
    CategorySeries, ForecastReport, ForecastResult, HistoryPoint, MonthlyCategoryTotal,
    SafeToSpend,
};

#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: EngineConfig,
    artifact: Option<PretrainedArtifact>,
}

impl ForecastEngine {
    /// Create an engine from explicit parts
    pub fn new(config: EngineConfig, artifact: Option<PretrainedArtifact>) -> Self {
        Self { config, artifact }
    }

    /// Create an engine, loading the artifact named in the config
    ///
    /// An unreadable artifact leaves the engine without one.
    pub fn from_config(config: EngineConfig) -> Self {
        let artifact = load_artifact(config.forecast.artifact.as_deref());
        Self::new(config, artifact)
    }

    /// Replace the artifact
    pub fn with_artifact(mut self, artifact: Option<PretrainedArtifact>) -> Self {
        self.artifact = artifact;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn artifact(&self) -> Option<&PretrainedArtifact> {
        self.artifact.as_ref()
    }

    /// Per-category chronological series
    pub fn series(&self, totals: &[MonthlyCategoryTotal]) -> Vec<CategorySeries> {
        build_category_series(totals)
    }

    /// Next-month forecast, `None` without any history
    pub fn forecast(&self, totals: &[MonthlyCategoryTotal]) -> Option<ForecastResult> {
        let series = self.series(totals);
        self.forecast_series(&series)
    }

    /// Safe-to-spend budget, `None` without any history
    pub fn safe_to_spend(&self, totals: &[MonthlyCategoryTotal]) -> Option<SafeToSpend> {
        let series = self.series(totals);
        let forecast = self.forecast_series(&series)?;
        Some(self.allocate(&series, &forecast))
    }

    /// Monthly actuals, oldest first
    pub fn history(&self, totals: &[MonthlyCategoryTotal]) -> Vec<HistoryPoint> {
        build_history(totals)
    }

    /// History, forecast and safe-to-spend in one pass
    pub fn report(&self, totals: &[MonthlyCategoryTotal]) -> ForecastReport {
        let series = self.series(totals);
        let forecast = self.forecast_series(&series);
        let safe_to_spend = forecast.as_ref().map(|f| self.allocate(&series, f));

        ForecastReport {
            history: self.history(totals),
            forecast,
            safe_to_spend,
        }
    }

    fn forecast_series(&self, series: &[CategorySeries]) -> Option<ForecastResult> {
        ForecastOrchestrator::new(&self.config.forecast, self.artifact.as_ref()).forecast(series)
    }

    fn allocate(&self, series: &[CategorySeries], forecast: &ForecastResult) -> SafeToSpend {
        SafeToSpendAllocator::new(&self.config.budget).allocate(series, forecast)
    }
}
