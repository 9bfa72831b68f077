//! Spendcast Core Library
//!
//! Forecasting and allocation engine for monthly category spending:
//! - Per-category time series from monthly aggregates
//! - Pretrained linear lag models with Holt smoothing fallback
//! - Safe-to-spend budgets from trailing income
//! - Monthly history for reporting
//! - Engine configuration with embedded defaults
//! - Loading aggregate files (CSV/JSON)

pub mod budget;
pub mod config;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod history;
pub mod ingest;
pub mod models;
pub mod month;

/// Test fixtures
#[cfg(test)]
pub mod test_utils;

pub use budget::{allocation_ratios, equal_split, SafeToSpendAllocator};
pub use config::{BudgetConfig, ConfigSource, EngineConfig, ForecastConfig};
pub use engine::ForecastEngine;
pub use error::{Error, Result};
pub use forecast::{
    build_category_series, CoveragePolicy, ForecastOrchestrator, HoltSmoother, LagModelPredictor,
    PretrainedArtifact, PretrainedCategoryModel,
};
pub use history::build_history;
pub use ingest::load_totals;
pub use models::{
    CategoryBudget, CategoryForecast, CategorySeries, CategorySeriesPoint, ForecastMethod,
    ForecastReport, ForecastResult, HistoryPoint, MonthlyCategoryTotal, SafeToSpend,
    CANONICAL_CATEGORIES, INCOME_CATEGORY,
};
