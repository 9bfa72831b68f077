//! Holt double exponential smoothing
//!
//! Fallback forecaster used when no pretrained model applies. Tracks a level
//! and a linear trend:
//!
//! ```text
//! level_t = α·y_t + (1−α)·(level_{t−1} + trend_{t−1})
//! trend_t = β·(level_t − level_{t−1}) + (1−β)·trend_{t−1}
//! ŷ_{t+h} = level_t + h·trend_t
//! ```

use crate::config::{ForecastConfig, DEFAULT_ALPHA, DEFAULT_BETA};
use crate::models::CategorySeries;

/// Fitted smoothing state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoltState {
    pub level: f64,
    pub trend: f64,
}

impl HoltState {
    pub fn forecast(&self, steps_ahead: usize) -> f64 {
        self.level + self.trend * steps_ahead as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoltSmoother {
    /// Level smoothing weight
    alpha: f64,
    /// Trend smoothing weight
    beta: f64,
}

impl Default for HoltSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA, DEFAULT_BETA)
    }
}

impl HoltSmoother {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.alpha, config.beta)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Fit level and trend to at least two chronological amounts
    ///
    /// Level starts at the first amount and trend at the first difference;
    /// the update then runs over every amount after the first.
    pub fn fit(&self, amounts: &[f64]) -> Option<HoltState> {
        if amounts.len() < 2 {
            return None;
        }

        let mut state = HoltState {
            level: amounts[0],
            trend: amounts[1] - amounts[0],
        };

        for &y in &amounts[1..] {
            let previous_level = state.level;
            state.level = self.alpha * y + (1.0 - self.alpha) * (state.level + state.trend);
            state.trend =
                self.beta * (state.level - previous_level) + (1.0 - self.beta) * state.trend;
        }

        Some(state)
    }

    /// Forecast `steps_ahead` periods past the last amount
    ///
    /// No history predicts 0 and a single observation predicts itself.
    pub fn forecast(&self, amounts: &[f64], steps_ahead: usize) -> f64 {
        match amounts {
            [] => 0.0,
            [only] => *only,
            _ => self
                .fit(amounts)
                .map(|state| state.forecast(steps_ahead))
                .unwrap_or(0.0),
        }
    }

    /// Forecast a category for the month at global index `next_index`
    ///
    /// When the category's last observation is older than the latest month in
    /// the dataset, the trend is extrapolated across the gap.
    pub fn forecast_series(&self, series: &CategorySeries, next_index: usize) -> f64 {
        let mut points = series.points.clone();
        points.sort_by_key(|p| p.index);

        let steps_ahead = points
            .last()
            .map(|last| next_index.saturating_sub(last.index).max(1))
            .unwrap_or(1);
        let amounts: Vec<f64> = points.iter().map(|p| p.amount).collect();

        self.forecast(&amounts, steps_ahead)
    }
}
