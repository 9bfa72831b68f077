//! Historical actuals per month

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{
    finite_or_zero, is_income, resolve_income_category, HistoryPoint, MonthlyCategoryTotal,
};

/// Group totals by month, oldest first
///
/// Each month keeps every category's recorded amount (Income included, for
/// display). `total_actual` sums the spending categories with negative
/// amounts counted as zero; Income and the resolved income source are left
/// out. Rows repeating a month and category are summed.
pub fn build_history(totals: &[MonthlyCategoryTotal]) -> Vec<HistoryPoint> {
    let categories: BTreeSet<&str> = totals.iter().map(|t| t.category.as_str()).collect();
    let income = resolve_income_category(categories.iter().copied());

    let mut by_month: BTreeMap<&str, BTreeMap<String, f64>> = BTreeMap::new();
    for total in totals {
        *by_month
            .entry(total.month_key.as_str())
            .or_default()
            .entry(total.category.clone())
            .or_insert(0.0) += total.total_amount;
    }

    by_month
        .into_iter()
        .map(|(month_key, actuals)| {
            let total_actual = finite_or_zero(
                actuals
                    .iter()
                    .filter(|(category, _)| {
                        !is_income(category) && Some(category.as_str()) != income
                    })
                    .map(|(_, amount)| amount.max(0.0))
                    .sum(),
                "total",
            );
            HistoryPoint {
                month_key: month_key.to_string(),
                actuals,
                total_actual,
            }
        })
        .collect()
}
