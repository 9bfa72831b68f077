//! Safe-to-spend allocation
//!
//! Sets aside a savings share of trailing average income and splits the rest
//! across forecast categories in proportion to their predicted spending.

use crate::config::BudgetConfig;
use crate::models::{
    finite_or_zero, is_income, resolve_income_category, CategoryBudget, CategorySeries,
    ForecastResult, SafeToSpend,
};

/// Locate the income series
///
/// Only series with data are candidates; see [`resolve_income_category`].
pub fn find_income_series(series: &[CategorySeries]) -> Option<&CategorySeries> {
    let category = resolve_income_category(
        series
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.category.as_str()),
    )?;
    series.iter().find(|s| s.category == category)
}

/// Mean absolute amount over the last `window` observed months
pub fn average_income(series: &CategorySeries, window: usize) -> Option<f64> {
    let mut points: Vec<_> = series.points.iter().collect();
    points.sort_by_key(|p| p.index);

    let recent = &points[points.len().saturating_sub(window)..];
    if recent.is_empty() {
        return None;
    }

    let avg = recent.iter().map(|p| p.amount.abs()).sum::<f64>() / recent.len() as f64;
    avg.is_finite().then_some(avg)
}

/// Share given to each of `count` categories when nothing is predicted
pub fn equal_split(count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        1.0 / count as f64
    }
}

/// Allocation ratio per prediction, summing to 1 for a non-empty input
///
/// Negative predictions count as zero. If every prediction is zero or
/// negative the split is equal.
pub fn allocation_ratios(predictions: &[f64]) -> Vec<f64> {
    let positive: Vec<f64> = predictions.iter().map(|p| p.max(0.0)).collect();
    let sum: f64 = positive.iter().sum();

    if sum > 0.0 && sum.is_finite() {
        positive.iter().map(|p| p / sum).collect()
    } else {
        vec![equal_split(predictions.len()); predictions.len()]
    }
}

/// Distributes a savings-adjusted income budget across forecast categories
pub struct SafeToSpendAllocator<'a> {
    config: &'a BudgetConfig,
}

impl<'a> SafeToSpendAllocator<'a> {
    pub fn new(config: &'a BudgetConfig) -> Self {
        Self { config }
    }

    /// Build the safe-to-spend view for a forecast
    ///
    /// Every forecast category except the income source is passed through.
    /// When no income has been observed, the income and budget figures are
    /// all `None`.
    pub fn allocate(&self, series: &[CategorySeries], forecast: &ForecastResult) -> SafeToSpend {
        let rate = self.config.target_savings_rate;
        let income_series = find_income_series(series);
        let targets: Vec<_> = forecast
            .categories
            .iter()
            .filter(|c| {
                !is_income(&c.category)
                    && income_series.map_or(true, |s| s.category != c.category)
            })
            .collect();

        let avg_monthly_income =
            income_series.and_then(|s| average_income(s, self.config.income_window_months));

        let Some(avg) = avg_monthly_income else {
            tracing::debug!("No income history, safe-to-spend budget unavailable");
            return SafeToSpend {
                target_savings_rate: rate,
                avg_monthly_income: None,
                safe_total_budget: None,
                categories: targets
                    .iter()
                    .map(|c| CategoryBudget {
                        category: c.category.clone(),
                        predicted: c.predicted,
                        safe_budget: None,
                    })
                    .collect(),
            };
        };

        let safe_total = finite_or_zero(avg * (1.0 - rate), "safe total");
        let predictions: Vec<f64> = targets.iter().map(|c| c.predicted).collect();
        let ratios = allocation_ratios(&predictions);

        let categories = targets
            .iter()
            .zip(ratios)
            .map(|(c, ratio)| CategoryBudget {
                category: c.category.clone(),
                predicted: c.predicted,
                safe_budget: Some(safe_total * ratio),
            })
            .collect();

        tracing::debug!(
            avg_income = avg,
            safe_total,
            categories = targets.len(),
            "Safe-to-spend allocated"
        );

        SafeToSpend {
            target_savings_rate: rate,
            avg_monthly_income: Some(avg),
            safe_total_budget: Some(safe_total),
            categories,
        }
    }
}
