//! Loading monthly category totals from files
//!
//! The aggregation step (grouping a ledger by month and category) happens
//! elsewhere; this module only reads its output. Two layouts are supported:
//!
//! - CSV with a header row: `month,category,total`
//! - JSON array of `{"month": ..., "category": ..., "total": ...}` objects
//!
//! The long field names used by [`MonthlyCategoryTotal`] (`month_key`,
//! `total_amount`) are accepted as well. Month labels are normalized to
//! `YYYY-MM-01` so the engine can rely on string ordering.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::MonthlyCategoryTotal;
use crate::month::normalize_month_key;

/// Supported aggregate file layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Ok(InputFormat::Csv),
            Some("json") => Ok(InputFormat::Json),
            other => Err(Error::InvalidData(format!(
                "Unsupported totals file type: {} (expected .csv or .json)",
                other.unwrap_or("none")
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTotal {
    #[serde(alias = "month_key", alias = "monthKey")]
    month: String,
    category: String,
    #[serde(alias = "total_amount", alias = "totalAmount", alias = "amount")]
    total: f64,
}

impl RawTotal {
    /// Validate and normalize one row (`row` is 1-based for messages)
    fn into_total(self, row: usize) -> Result<MonthlyCategoryTotal> {
        let month_key = normalize_month_key(&self.month).ok_or_else(|| {
            Error::InvalidData(format!("Row {}: invalid month '{}'", row, self.month))
        })?;

        let category = self.category.trim();
        if category.is_empty() {
            return Err(Error::InvalidData(format!("Row {}: empty category", row)));
        }

        if !self.total.is_finite() {
            return Err(Error::InvalidData(format!(
                "Row {}: total must be a finite number",
                row
            )));
        }

        Ok(MonthlyCategoryTotal::new(month_key, category, self.total))
    }
}

/// Parse CSV totals from any reader
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<MonthlyCategoryTotal>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut totals = Vec::new();
    for (i, record) in rdr.deserialize::<RawTotal>().enumerate() {
        totals.push(record?.into_total(i + 1)?);
    }

    Ok(totals)
}

/// Parse a JSON array of totals
pub fn parse_json(content: &str) -> Result<Vec<MonthlyCategoryTotal>> {
    let raw: Vec<RawTotal> = serde_json::from_str(content)?;
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| r.into_total(i + 1))
        .collect()
}

/// Load totals from a `.csv` or `.json` file
pub fn load_totals(path: &Path) -> Result<Vec<MonthlyCategoryTotal>> {
    let format = InputFormat::from_path(path)?;
    if !path.exists() {
        return Err(Error::NotFound(format!("totals file {}", path.display())));
    }

    let totals = match format {
        InputFormat::Csv => parse_csv(File::open(path)?)?,
        InputFormat::Json => parse_json(&std::fs::read_to_string(path)?)?,
    };

    tracing::debug!(path = %path.display(), rows = totals.len(), "Loaded monthly totals");
    Ok(totals)
}
