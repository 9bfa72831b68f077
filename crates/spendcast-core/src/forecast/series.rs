//! Time series construction from monthly aggregates

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{
    CategorySeries, CategorySeriesPoint, MonthlyCategoryTotal, CANONICAL_CATEGORIES,
};
use crate::month::is_month_key;

/// Distinct month keys in chronological order
///
/// Relies on month keys being fixed-width `YYYY-MM-01` strings, which sort
/// chronologically as plain strings.
pub fn distinct_months(totals: &[MonthlyCategoryTotal]) -> Vec<String> {
    debug_assert!(
        totals.iter().all(|t| is_month_key(&t.month_key)),
        "month keys must be normalized to YYYY-MM-01"
    );

    totals
        .iter()
        .map(|t| t.month_key.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Build one chronological series per category
///
/// Every canonical category is present (possibly empty), followed by any
/// other category seen in the data in name order. Point indexes are global:
/// index `i` is the i-th distinct month across the whole dataset, so a month
/// missing from one category shows up as a skipped index. Rows for the same
/// month and category are summed. The input slice is never reordered.
pub fn build_category_series(totals: &[MonthlyCategoryTotal]) -> Vec<CategorySeries> {
    let months = distinct_months(totals);
    let month_index: HashMap<&str, usize> = months
        .iter()
        .enumerate()
        .map(|(i, m)| (m.as_str(), i))
        .collect();

    // category -> index -> amount
    let mut grouped: BTreeMap<&str, BTreeMap<usize, f64>> = BTreeMap::new();
    for total in totals {
        let Some(&index) = month_index.get(total.month_key.as_str()) else {
            continue;
        };
        *grouped
            .entry(total.category.as_str())
            .or_default()
            .entry(index)
            .or_insert(0.0) += total.total_amount;
    }

    let to_series = |category: &str, grouped: &BTreeMap<&str, BTreeMap<usize, f64>>| {
        let points: Vec<CategorySeriesPoint> = grouped
            .get(category)
            .map(|by_index| {
                by_index
                    .iter()
                    .map(|(&index, &amount)| CategorySeriesPoint {
                        month_key: months[index].clone(),
                        index,
                        amount,
                    })
                    .collect()
            })
            .unwrap_or_default();
        CategorySeries {
            category: category.to_string(),
            points,
        }
    };

    let mut series: Vec<CategorySeries> = CANONICAL_CATEGORIES
        .iter()
        .map(|category| to_series(category, &grouped))
        .collect();

    series.extend(
        grouped
            .keys()
            .filter(|category| !CANONICAL_CATEGORIES.contains(*category))
            .map(|category| to_series(category, &grouped)),
    );

    tracing::debug!(
        months = months.len(),
        categories = series.len(),
        "Built category series"
    );

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::totals;

    fn find<'a>(series: &'a [CategorySeries], category: &str) -> &'a CategorySeries {
        series.iter().find(|s| s.category == category).unwrap()
    }

    #[test]
    fn test_empty_input_has_canonical_categories() {
        let series = build_category_series(&[]);
        assert_eq!(series.len(), CANONICAL_CATEGORIES.len());
        for (s, name) in series.iter().zip(CANONICAL_CATEGORIES) {
            assert_eq!(s.category, name);
            assert!(s.points.is_empty());
        }
    }

    #[test]
    fn test_global_indexes_show_gaps() {
        let data = totals(&[
            ("2024-03-01", "Dining", 30.0),
            ("2024-01-01", "Dining", 10.0),
            ("2024-02-01", "Groceries", 200.0),
        ]);

        let series = build_category_series(&data);
        let dining = find(&series, "Dining");

        // Dining skips February, so its indexes jump from 0 to 2
        let indexes: Vec<usize> = dining.points.iter().map(|p| p.index).collect();
        assert_eq!(indexes, vec![0, 2]);
        assert_eq!(dining.points[0].month_key, "2024-01-01");
        assert_eq!(dining.points[1].amount, 30.0);

        let groceries = find(&series, "Groceries");
        assert_eq!(groceries.points.len(), 1);
        assert_eq!(groceries.points[0].index, 1);
    }

    #[test]
    fn test_extra_categories_follow_canonical() {
        let data = totals(&[
            ("2024-01-01", "Pets", 40.0),
            ("2024-01-01", "Gifts", 25.0),
            ("2024-01-01", "Dining", 10.0),
        ]);

        let series = build_category_series(&data);
        let names: Vec<&str> = series.iter().map(|s| s.category.as_str()).collect();

        assert_eq!(&names[..7], &CANONICAL_CATEGORIES[..]);
        assert_eq!(&names[7..], &["Gifts", "Pets"]);
    }

    #[test]
    fn test_duplicate_rows_are_summed() {
        let data = totals(&[
            ("2024-01-01", "Dining", 10.0),
            ("2024-01-01", "Dining", 15.0),
        ]);

        let series = build_category_series(&data);
        let dining = find(&series, "Dining");
        assert_eq!(dining.points.len(), 1);
        assert_eq!(dining.points[0].amount, 25.0);
    }

    #[test]
    fn test_idempotent_and_input_untouched() {
        let data = totals(&[
            ("2024-02-01", "Transport", 60.0),
            ("2024-01-01", "Transport", 50.0),
            ("2024-01-01", "Income", -3000.0),
        ]);
        let before = data.clone();

        let first = build_category_series(&data);
        let second = build_category_series(&data);

        assert_eq!(first, second);
        assert_eq!(data, before);
    }

    #[test]
    fn test_distinct_months_sorted() {
        let data = totals(&[
            ("2024-02-01", "Dining", 1.0),
            ("2023-11-01", "Dining", 1.0),
            ("2024-02-01", "Other", 1.0),
        ]);
        assert_eq!(distinct_months(&data), vec!["2023-11-01", "2024-02-01"]);
    }
}
