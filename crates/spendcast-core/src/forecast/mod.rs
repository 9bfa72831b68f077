//! Next-month spending forecasts
//!
//! Raw monthly totals are reshaped into per-category series, then one of
//! three prediction paths runs:
//!
//! - **Naive persistence** when fewer than two months exist
//! - **Pretrained lag models** when an artifact is loaded and covers a category
//! - **Holt smoothing** otherwise
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendcast_core::forecast::{build_category_series, ForecastOrchestrator};
//!
//! let series = build_category_series(&totals);
//! let forecast = ForecastOrchestrator::new(&config.forecast, artifact.as_ref()).forecast(&series);
//! ```

pub mod holt;
pub mod orchestrator;
pub mod pretrained;
pub mod series;

pub use holt::{HoltSmoother, HoltState};
pub use orchestrator::{CoveragePolicy, ForecastOrchestrator, MIN_MONTHS_FOR_MODELS};
pub use pretrained::{
    load_artifact, pad_with_oldest, LagModelPredictor, LagPadding, PretrainedArtifact,
    PretrainedCategoryModel,
};
pub use series::{build_category_series, distinct_months};
