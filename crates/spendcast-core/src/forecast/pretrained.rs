//! Pretrained linear lag models
//!
//! An artifact is produced offline and shipped as JSON:
//!
//! ```json
//! {
//!   "version": "2024.06",
//!   "trainedAt": "2024-06-01T00:00:00Z",
//!   "categories": {
//!     "Dining": { "intercept": 12.0, "lags": [0.6, 0.3] }
//!   },
//!   "default": { "intercept": 0.0, "lags": [1.0] }
//! }
//! ```
//!
//! The engine never trains or mutates an artifact. A missing or malformed
//! artifact is treated as absent and the caller falls back to smoothing.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::models::{finite_or_zero, is_income, CategoryForecast, CategorySeries};

/// Linear model over the most recent observations of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PretrainedCategoryModel {
    pub intercept: f64,
    /// `lags[i]` weights the (i+1)-th most recent observation
    #[serde(default)]
    pub lags: Vec<f64>,
}

impl PretrainedCategoryModel {
    pub fn lag_order(&self) -> usize {
        self.lags.len()
    }

    /// Apply the model to a chronological (oldest first) list of amounts
    pub fn predict(&self, amounts: &[f64], padding: LagPadding) -> f64 {
        self.lags
            .iter()
            .enumerate()
            .fold(self.intercept, |acc, (lag, coefficient)| {
                acc + coefficient * padding(amounts, lag)
            })
    }

    fn is_finite(&self) -> bool {
        self.intercept.is_finite() && self.lags.iter().all(|c| c.is_finite())
    }
}

/// Offline-trained lag models, one per category plus an optional default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PretrainedArtifact {
    pub version: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub trained_at: DateTime<Utc>,
    pub categories: BTreeMap<String, PretrainedCategoryModel>,
    #[serde(default)]
    pub default: Option<PretrainedCategoryModel>,
}

impl PretrainedArtifact {
    /// Parse and validate an artifact document
    pub fn from_json(content: &str) -> Result<Self> {
        let artifact: Self = serde_json::from_str(content)?;

        for (category, model) in &artifact.categories {
            if !model.is_finite() {
                return Err(Error::InvalidData(format!(
                    "Non-finite coefficient in model for {}",
                    category
                )));
            }
        }
        if let Some(default) = &artifact.default {
            if !default.is_finite() {
                return Err(Error::InvalidData(
                    "Non-finite coefficient in default model".to_string(),
                ));
            }
        }

        Ok(artifact)
    }

    /// Read an artifact from disk, reporting why it could not be used
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!("artifact {}", path.display())));
        }
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Read an artifact from disk, treating any failure as "no artifact"
    pub fn load(path: &Path) -> Option<Self> {
        match Self::read(path) {
            Ok(artifact) => {
                tracing::info!(
                    path = %path.display(),
                    version = %artifact.version,
                    models = artifact.categories.len(),
                    has_default = artifact.default.is_some(),
                    "Loaded pretrained artifact"
                );
                Some(artifact)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Pretrained artifact unavailable, using fallback forecaster"
                );
                None
            }
        }
    }

    /// Category-specific model, else the default model
    pub fn model_for(&self, category: &str) -> Option<&PretrainedCategoryModel> {
        self.categories.get(category).or(self.default.as_ref())
    }
}

/// Load an optional artifact; `None` in, `None` out
pub fn load_artifact(path: Option<&Path>) -> Option<PretrainedArtifact> {
    path.and_then(PretrainedArtifact::load)
}

/// Accept RFC 3339 timestamps as well as naive ISO-8601 (assumed UTC)
fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Some(naive) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc());
    }

    Err(serde::de::Error::custom(format!(
        "invalid trainedAt timestamp: {}",
        raw
    )))
}

/// Picks the feature for lag position `lag` from chronological amounts
pub type LagPadding = fn(&[f64], usize) -> f64;

/// The (lag+1)-th most recent amount, or the earliest amount when the
/// history is shorter than that
///
/// Returns 0 for an empty history.
pub fn pad_with_oldest(amounts: &[f64], lag: usize) -> f64 {
    if lag < amounts.len() {
        amounts[amounts.len() - 1 - lag]
    } else {
        amounts.first().copied().unwrap_or(0.0)
    }
}

/// Applies pretrained lag models to category series
pub struct LagModelPredictor<'a> {
    artifact: Option<&'a PretrainedArtifact>,
    padding: LagPadding,
}

impl<'a> LagModelPredictor<'a> {
    pub fn new(artifact: Option<&'a PretrainedArtifact>) -> Self {
        Self {
            artifact,
            padding: pad_with_oldest,
        }
    }

    /// Use a different policy for histories shorter than the lag order
    pub fn with_padding(mut self, padding: LagPadding) -> Self {
        self.padding = padding;
        self
    }

    /// Predict next-month amounts
    ///
    /// Returns `None` when no artifact is loaded. Income is skipped, and so is
    /// any category with neither a specific nor a default model. Categories
    /// with no observations predict 0.
    pub fn predict(&self, series: &[CategorySeries]) -> Option<Vec<CategoryForecast>> {
        let artifact = self.artifact?;

        let mut predictions = Vec::new();
        for s in series.iter().filter(|s| !is_income(&s.category)) {
            let Some(model) = artifact.model_for(&s.category) else {
                tracing::debug!(category = %s.category, "No pretrained model for category");
                continue;
            };

            let predicted = if s.points.is_empty() {
                0.0
            } else {
                let mut points = s.points.clone();
                points.sort_by_key(|p| p.index);
                let amounts: Vec<f64> = points.iter().map(|p| p.amount).collect();
                finite_or_zero(model.predict(&amounts, self.padding), &s.category)
            };

            predictions.push(CategoryForecast {
                category: s.category.clone(),
                predicted,
            });
        }

        Some(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::build_category_series;
    use crate::test_utils::{model, totals};
    use std::io::Write;

    const ARTIFACT_JSON: &str = r#"{
        "version": "v3",
        "trainedAt": "2024-06-01T08:30:00Z",
        "categories": {
            "Dining": { "intercept": 10.0, "lags": [0.5, 0.25] }
        },
        "default": { "intercept": 1.0, "lags": [1.0] }
    }"#;

    #[test]
    fn test_parse_artifact() {
        let artifact = PretrainedArtifact::from_json(ARTIFACT_JSON).unwrap();
        assert_eq!(artifact.version, "v3");
        assert_eq!(artifact.trained_at.to_rfc3339(), "2024-06-01T08:30:00+00:00");
        assert_eq!(artifact.categories["Dining"].lag_order(), 2);
        assert!(artifact.default.is_some());
    }

    #[test]
    fn test_parse_naive_timestamp() {
        let artifact = PretrainedArtifact::from_json(
            r#"{"version": "1", "trainedAt": "2024-06-01T08:30:00.123456", "categories": {}}"#,
        )
        .unwrap();
        assert_eq!(artifact.trained_at.format("%Y-%m-%d %H:%M").to_string(), "2024-06-01 08:30");
        assert!(artifact.default.is_none());
    }

    #[test]
    fn test_malformed_artifacts_rejected() {
        assert!(PretrainedArtifact::from_json("{").is_err());
        assert!(PretrainedArtifact::from_json(r#"{"version": "1"}"#).is_err());
        assert!(PretrainedArtifact::from_json(
            r#"{"version": "1", "trainedAt": "yesterday", "categories": {}}"#
        )
        .is_err());
        assert!(PretrainedArtifact::from_json(
            r#"{"version": "1", "trainedAt": "2024-01-01", "categories": {"Dining": {"intercept": "x"}}}"#
        )
        .is_err());
    }

    #[test]
    fn test_load_fails_soft() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PretrainedArtifact::load(&dir.path().join("missing.json")).is_none());

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "not json at all").unwrap();
        assert!(PretrainedArtifact::load(broken.path()).is_none());

        let mut good = tempfile::NamedTempFile::new().unwrap();
        write!(good, "{}", ARTIFACT_JSON).unwrap();
        assert!(PretrainedArtifact::load(good.path()).is_some());

        assert!(load_artifact(None).is_none());
    }

    #[test]
    fn test_read_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PretrainedArtifact::read(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_pad_with_oldest() {
        let amounts = [10.0, 20.0, 30.0];
        assert_eq!(pad_with_oldest(&amounts, 0), 30.0);
        assert_eq!(pad_with_oldest(&amounts, 2), 10.0);
        // Beyond the history, reuse the earliest value
        assert_eq!(pad_with_oldest(&amounts, 3), 10.0);
        assert_eq!(pad_with_oldest(&amounts, 7), 10.0);
        assert_eq!(pad_with_oldest(&[], 0), 0.0);
    }

    #[test]
    fn test_model_predict_with_padding() {
        let m = model(5.0, &[0.5, 0.3, 0.2]);
        // features: 40 (latest), 20, then padded with oldest 20
        let predicted = m.predict(&[20.0, 40.0], pad_with_oldest);
        assert!((predicted - (5.0 + 0.5 * 40.0 + 0.3 * 20.0 + 0.2 * 20.0)).abs() < 1e-9);

        // A model with no lags is just its intercept
        assert_eq!(model(7.5, &[]).predict(&[100.0], pad_with_oldest), 7.5);
    }

    #[test]
    fn test_predictor_without_artifact() {
        let series = build_category_series(&totals(&[("2024-01-01", "Dining", 10.0)]));
        assert!(LagModelPredictor::new(None).predict(&series).is_none());
    }

    #[test]
    fn test_predictor_uses_specific_then_default() {
        let artifact = PretrainedArtifact::from_json(ARTIFACT_JSON).unwrap();
        let series = build_category_series(&totals(&[
            ("2024-01-01", "Dining", 100.0),
            ("2024-02-01", "Dining", 120.0),
            ("2024-01-01", "Transport", 50.0),
            ("2024-01-01", "Income", 4000.0),
        ]));

        let predictions = LagModelPredictor::new(Some(&artifact))
            .predict(&series)
            .unwrap();

        let get = |name: &str| {
            predictions
                .iter()
                .find(|p| p.category == name)
                .map(|p| p.predicted)
        };

        // Dining: 10 + 0.5*120 + 0.25*100
        assert_eq!(get("Dining"), Some(95.0));
        // Transport falls back to the default model: 1 + 1.0*50
        assert_eq!(get("Transport"), Some(51.0));
        // Empty canonical categories still get the default model and predict 0
        assert_eq!(get("Groceries"), Some(0.0));
        assert_eq!(get("Income"), None);
    }

    #[test]
    fn test_predictor_omits_categories_without_model() {
        let mut artifact = PretrainedArtifact::from_json(ARTIFACT_JSON).unwrap();
        artifact.default = None;

        let series = build_category_series(&totals(&[
            ("2024-01-01", "Dining", 100.0),
            ("2024-01-01", "Transport", 50.0),
        ]));

        let predictions = LagModelPredictor::new(Some(&artifact))
            .predict(&series)
            .unwrap();
        let names: Vec<&str> = predictions.iter().map(|p| p.category.as_str()).collect();
        assert_eq!(names, vec!["Dining"]);
    }

    #[test]
    fn test_custom_padding_policy() {
        fn pad_with_zero(amounts: &[f64], lag: usize) -> f64 {
            if lag < amounts.len() {
                amounts[amounts.len() - 1 - lag]
            } else {
                0.0
            }
        }

        let mut artifact = PretrainedArtifact::from_json(ARTIFACT_JSON).unwrap();
        artifact.default = None;
        let series = build_category_series(&totals(&[("2024-01-01", "Dining", 100.0)]));

        let predictions = LagModelPredictor::new(Some(&artifact))
            .with_padding(pad_with_zero)
            .predict(&series)
            .unwrap();

        // 10 + 0.5*100 + 0.25*0
        assert_eq!(predictions[0].predicted, 60.0);
    }
}
