//! Data models for Spendcast

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Categories that are always present in series output, in display order
pub const CANONICAL_CATEGORIES: [&str; 7] = [
    "Dining",
    "Groceries",
    "Subscriptions",
    "Transport",
    "Uncategorized",
    "Other",
    "Income",
];

/// Name of the income category
pub const INCOME_CATEGORY: &str = "Income";

/// Whether a category is the income category (case-insensitive exact match)
///
/// Income is informational only: it is never forecast, never counted in
/// totals and never receives a budget allocation.
pub fn is_income(category: &str) -> bool {
    category.eq_ignore_ascii_case(INCOME_CATEGORY)
}

/// Pick the income source among the categories that have data
///
/// An exact "Income" wins; otherwise the first name containing "income"
/// (case-insensitive) is used. The chosen category is treated like Income
/// everywhere: excluded from forecasts, totals and allocations.
pub fn resolve_income_category<'a, I>(categories: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut fallback = None;
    for category in categories {
        if is_income(category) {
            return Some(category);
        }
        if fallback.is_none() && category.to_lowercase().contains("income") {
            fallback = Some(category);
        }
    }
    fallback
}

/// Replace a non-finite value with zero, logging the substitution
pub(crate) fn finite_or_zero(value: f64, category: &str) -> f64 {
    if value.is_finite() {
        value
    } else {
        tracing::warn!(category, value, "Non-finite value replaced with 0");
        0.0
    }
}

/// Spending total for one category in one calendar month
///
/// Produced by the aggregation step that sits in front of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCategoryTotal {
    /// First-of-month date string (`YYYY-MM-01`)
    pub month_key: String,
    pub category: String,
    /// Signed amount (expenses and income as recorded)
    pub total_amount: f64,
}

impl MonthlyCategoryTotal {
    pub fn new(month_key: impl Into<String>, category: impl Into<String>, total_amount: f64) -> Self {
        Self {
            month_key: month_key.into(),
            category: category.into(),
            total_amount,
        }
    }
}

/// One observation in a category series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySeriesPoint {
    pub month_key: String,
    /// Position among all distinct months in the dataset (not per category)
    pub index: usize,
    pub amount: f64,
}

/// Chronological observations for a single category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySeries {
    pub category: String,
    /// Sorted ascending by `index`; may be empty
    pub points: Vec<CategorySeriesPoint>,
}

impl CategorySeries {
    pub fn empty(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            points: Vec::new(),
        }
    }

    /// Most recent observation
    pub fn latest(&self) -> Option<&CategorySeriesPoint> {
        self.points.iter().max_by_key(|p| p.index)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Which prediction path produced a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Linear lag model from a pretrained artifact
    Pretrained,
    /// Holt double exponential smoothing
    Holt,
    /// Last observed value (fewer than two months of history)
    NaivePersistence,
}

impl ForecastMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::Pretrained => "pretrained",
            ForecastMethod::Holt => "holt",
            ForecastMethod::NaivePersistence => "naive_persistence",
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ForecastMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretrained" => Ok(ForecastMethod::Pretrained),
            "holt" => Ok(ForecastMethod::Holt),
            "naive_persistence" => Ok(ForecastMethod::NaivePersistence),
            _ => Err(format!("Unknown forecast method: {}", s)),
        }
    }
}

/// Predicted spending for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryForecast {
    pub category: String,
    /// Unclipped prediction (may be negative)
    pub predicted: f64,
}

/// Next-month forecast across categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Month being forecast (`YYYY-MM-01`)
    pub next_month_key: String,
    pub method: ForecastMethod,
    /// Artifact version when `method` is `Pretrained`
    pub model_version: Option<String>,
    pub categories: Vec<CategoryForecast>,
    /// Sum of predictions, each floored at zero
    pub total_predicted: f64,
}

impl ForecastResult {
    pub fn predicted_for(&self, category: &str) -> Option<f64> {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.predicted)
    }
}

/// Safe-to-spend allocation for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub category: String,
    pub predicted: f64,
    /// `None` when average income is unknown
    pub safe_budget: Option<f64>,
}

/// Income-driven budget split across forecast categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeToSpend {
    pub target_savings_rate: f64,
    pub avg_monthly_income: Option<f64>,
    pub safe_total_budget: Option<f64>,
    pub categories: Vec<CategoryBudget>,
}

/// Actual spending for one historical month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub month_key: String,
    /// Actual amounts as recorded, including Income
    pub actuals: BTreeMap<String, f64>,
    /// Sum of non-Income actuals, each floored at zero
    pub total_actual: f64,
}

/// Everything the reporting layer needs in one document
///
/// `forecast` and `safe_to_spend` are `None` when there is no history at all,
/// which is distinct from a forecast of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub history: Vec<HistoryPoint>,
    pub forecast: Option<ForecastResult>,
    pub safe_to_spend: Option<SafeToSpend>,
}

impl ForecastReport {
    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_income() {
        assert!(is_income("Income"));
        assert!(is_income("income"));
        assert!(is_income("INCOME"));
        assert!(!is_income("Side Income"));
        assert!(!is_income("Dining"));
    }

    #[test]
    fn test_resolve_income_category() {
        assert_eq!(
            resolve_income_category(["Side Income", "Dining", "INCOME"]),
            Some("INCOME")
        );
        assert_eq!(
            resolve_income_category(["Dining", "Salary Income", "Bonus income"]),
            Some("Salary Income")
        );
        assert_eq!(resolve_income_category(["Dining", "Groceries"]), None);
    }

    #[test]
    fn test_forecast_method_round_trip() {
        assert_eq!(ForecastMethod::NaivePersistence.as_str(), "naive_persistence");
        assert_eq!(
            ForecastMethod::from_str("holt").unwrap(),
            ForecastMethod::Holt
        );
        assert!(ForecastMethod::from_str("arima").is_err());
    }

    #[test]
    fn test_series_latest_uses_index() {
        let series = CategorySeries {
            category: "Dining".to_string(),
            points: vec![
                CategorySeriesPoint {
                    month_key: "2024-03-01".to_string(),
                    index: 2,
                    amount: 30.0,
                },
                CategorySeriesPoint {
                    month_key: "2024-01-01".to_string(),
                    index: 0,
                    amount: 10.0,
                },
            ],
        };
        assert_eq!(series.latest().unwrap().amount, 30.0);
        assert!(CategorySeries::empty("Other").latest().is_none());
    }

    #[test]
    fn test_finite_or_zero() {
        assert_eq!(finite_or_zero(12.5, "Dining"), 12.5);
        assert_eq!(finite_or_zero(f64::NAN, "Dining"), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY, "Dining"), 0.0);
    }

    #[test]
    fn test_monthly_total_deserialize() {
        let total: MonthlyCategoryTotal = serde_json::from_str(
            r#"{"month_key": "2024-01-01", "category": "Dining", "total_amount": -42.5}"#,
        )
        .unwrap();
        assert_eq!(total, MonthlyCategoryTotal::new("2024-01-01", "Dining", -42.5));
    }
}
