//! Calendar month keys
//!
//! A month key is a first-of-month date string (`YYYY-MM-01`). Because the
//! format is fixed-width, lexicographic order equals chronological order, and
//! the series and history builders sort on the raw strings. Anything that
//! produces keys should go through [`normalize_month_key`].

use chrono::{Datelike, Months, NaiveDate};

/// Format of a normalized month key
pub const MONTH_KEY_FORMAT: &str = "%Y-%m-%d";

/// Parse `YYYY-MM-DD` or `YYYY-MM` into the first day of that month
fn parse_month(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, MONTH_KEY_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", raw), MONTH_KEY_FORMAT))
        .ok()?;
    date.with_day(1)
}

/// Normalize a raw month label into `YYYY-MM-01`
///
/// Accepts full dates (any day of the month) and bare `YYYY-MM` labels.
/// Returns `None` if the label is not a calendar date.
pub fn normalize_month_key(raw: &str) -> Option<String> {
    parse_month(raw).map(|d| d.format(MONTH_KEY_FORMAT).to_string())
}

/// Whether a key is already in normalized `YYYY-MM-01` form
pub fn is_month_key(key: &str) -> bool {
    key.len() == 10 && normalize_month_key(key).as_deref() == Some(key)
}

/// The month key one calendar month after `key`
pub fn next_month_key(key: &str) -> Option<String> {
    parse_month(key)?
        .checked_add_months(Months::new(1))
        .map(|d| d.format(MONTH_KEY_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_month_key() {
        assert_eq!(normalize_month_key("2024-03-17").unwrap(), "2024-03-01");
        assert_eq!(normalize_month_key("2024-03").unwrap(), "2024-03-01");
        assert_eq!(normalize_month_key(" 2024-03-01 ").unwrap(), "2024-03-01");
        assert!(normalize_month_key("March 2024").is_none());
        assert!(normalize_month_key("2024-13").is_none());
    }

    #[test]
    fn test_is_month_key() {
        assert!(is_month_key("2024-01-01"));
        assert!(!is_month_key("2024-01-15"));
        assert!(!is_month_key("2024-01"));
        assert!(!is_month_key("2024-1-01"));
    }

    #[test]
    fn test_next_month_key() {
        assert_eq!(next_month_key("2024-01-01").unwrap(), "2024-02-01");
        assert_eq!(next_month_key("2024-02-01").unwrap(), "2024-03-01");
        // Year rollover
        assert_eq!(next_month_key("2023-12-01").unwrap(), "2024-01-01");
        assert!(next_month_key("garbage").is_none());
    }

    #[test]
    fn test_lexicographic_order_is_chronological() {
        let mut keys = vec!["2024-10-01", "2023-12-01", "2024-02-01"];
        keys.sort();
        assert_eq!(keys, vec!["2023-12-01", "2024-02-01", "2024-10-01"]);
    }
}
