//! Shared fixtures for unit tests

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};

use crate::forecast::{PretrainedArtifact, PretrainedCategoryModel};
use crate::models::MonthlyCategoryTotal;

/// Build totals from `(month_key, category, amount)` rows
pub fn totals(rows: &[(&str, &str, f64)]) -> Vec<MonthlyCategoryTotal> {
    rows.iter()
        .map(|&(month, category, amount)| MonthlyCategoryTotal::new(month, category, amount))
        .collect()
}

pub fn model(intercept: f64, lags: &[f64]) -> PretrainedCategoryModel {
    PretrainedCategoryModel {
        intercept,
        lags: lags.to_vec(),
    }
}

/// Artifact with version "test" and the given per-category models
pub fn artifact(
    models: &[(&str, PretrainedCategoryModel)],
    default: Option<PretrainedCategoryModel>,
) -> PretrainedArtifact {
    PretrainedArtifact {
        version: "test".to_string(),
        trained_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        categories: models
            .iter()
            .map(|(name, m)| (name.to_string(), m.clone()))
            .collect::<BTreeMap<_, _>>(),
        default,
    }
}
