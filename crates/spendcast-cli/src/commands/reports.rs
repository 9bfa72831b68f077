//! Report command implementations

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use spendcast_core::models::{is_income, resolve_income_category};
use spendcast_core::{ForecastResult, HistoryPoint, SafeToSpend, INCOME_CATEGORY};

use super::core::{build_engine, load_config, load_input, prepare};
use super::{format_amount, truncate};
use crate::cli::InputArgs;

const NO_HISTORY: &str = "   No history yet. Import some monthly totals first.";

pub fn cmd_forecast(config_path: Option<&Path>, input: &InputArgs, json: bool) -> Result<()> {
    let (engine, totals) = prepare(config_path, input)?;
    let forecast = engine.forecast(&totals);

    if json {
        println!("{}", serde_json::to_string_pretty(&forecast)?);
        return Ok(());
    }

    print!("{}", render_forecast(forecast.as_ref()));
    Ok(())
}

pub fn cmd_budget(
    config_path: Option<&Path>,
    input: &InputArgs,
    savings_rate: Option<f64>,
    json: bool,
) -> Result<()> {
    let (mut config, _) = load_config(config_path)?;
    if let Some(rate) = savings_rate {
        config.budget.target_savings_rate = rate;
        config.validate().context("Invalid --savings-rate")?;
    }

    let engine = build_engine(config, input.artifact.as_deref());
    let totals = load_input(&input.totals)?;
    let safe = engine.safe_to_spend(&totals);

    if json {
        println!("{}", serde_json::to_string_pretty(&safe)?);
        return Ok(());
    }

    print!("{}", render_budget(safe.as_ref()));
    Ok(())
}

pub fn cmd_history(totals: &Path, json: bool) -> Result<()> {
    let totals = load_input(totals)?;
    let history = spendcast_core::build_history(&totals);

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    print!("{}", render_history(&history));
    Ok(())
}

pub fn cmd_report(config_path: Option<&Path>, input: &InputArgs) -> Result<()> {
    let (engine, totals) = prepare(config_path, input)?;
    let report = engine.report(&totals);

    tracing::info!(
        months = report.history.len(),
        has_forecast = report.forecast.is_some(),
        "Report generated"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Forecast as a table
pub fn render_forecast(forecast: Option<&ForecastResult>) -> String {
    let mut out = String::new();
    out.push_str("\n📈 Spending Forecast\n");

    let Some(forecast) = forecast else {
        out.push_str(NO_HISTORY);
        out.push('\n');
        return out;
    };

    out.push_str(&format!(
        "   Month: {}   Method: {}",
        forecast.next_month_key, forecast.method
    ));
    if let Some(version) = &forecast.model_version {
        out.push_str(&format!(" (model {})", version));
    }
    out.push('\n');
    out.push_str("   ─────────────────────────────────────────\n");
    out.push_str(&format!("   {:25} │ {:>12}\n", "Category", "Predicted"));
    out.push_str("   ──────────────────────────┼─────────────\n");

    for c in &forecast.categories {
        out.push_str(&format!(
            "   {:25} │ {:>12.2}\n",
            truncate(&c.category, 25),
            c.predicted
        ));
    }

    out.push_str("   ──────────────────────────┼─────────────\n");
    out.push_str(&format!(
        "   {:25} │ {:>12.2}\n",
        "Total", forecast.total_predicted
    ));
    out
}

/// Safe-to-spend budget as a table
pub fn render_budget(safe: Option<&SafeToSpend>) -> String {
    let mut out = String::new();
    out.push_str("\n💰 Safe to Spend\n");

    let Some(safe) = safe else {
        out.push_str(NO_HISTORY);
        out.push('\n');
        return out;
    };

    out.push_str(&format!(
        "   Avg monthly income: {}   Savings target: {:.0}%\n",
        format_amount(safe.avg_monthly_income),
        safe.target_savings_rate * 100.0
    ));
    out.push_str(&format!(
        "   Safe total budget:  {}\n",
        format_amount(safe.safe_total_budget)
    ));
    if safe.avg_monthly_income.is_none() {
        out.push_str(&format!(
            "   No {} recorded, so no budget can be set.\n",
            INCOME_CATEGORY.to_lowercase()
        ));
    }
    out.push_str("   ─────────────────────────────────────────────────────\n");
    out.push_str(&format!(
        "   {:25} │ {:>12} │ {:>12}\n",
        "Category", "Predicted", "Safe Budget"
    ));
    out.push_str("   ──────────────────────────┼──────────────┼─────────────\n");

    for c in &safe.categories {
        out.push_str(&format!(
            "   {:25} │ {:>12.2} │ {:>12}\n",
            truncate(&c.category, 25),
            c.predicted,
            format_amount(c.safe_budget)
        ));
    }
    out
}

/// Monthly actuals as a table
pub fn render_history(history: &[HistoryPoint]) -> String {
    let mut out = String::new();
    out.push_str("\n🗓️  Spending History\n");

    if history.is_empty() {
        out.push_str(NO_HISTORY);
        out.push('\n');
        return out;
    }

    out.push_str(&format!(
        "   {:12} │ {:>12} │ {:>12} │ {}\n",
        "Month", "Spent", "Income", "Top category"
    ));
    out.push_str("   ─────────────┼──────────────┼──────────────┼─────────────────\n");

    let categories: BTreeSet<&str> = history
        .iter()
        .flat_map(|p| p.actuals.keys().map(String::as_str))
        .collect();
    let income_category = resolve_income_category(categories.iter().copied());

    for point in history {
        let income = income_category.and_then(|c| point.actuals.get(c).copied());
        let top = point
            .actuals
            .iter()
            .filter(|(category, _)| {
                !is_income(category) && Some(category.as_str()) != income_category
            })
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(category, amount)| format!("{} ({:.2})", truncate(category, 20), amount))
            .unwrap_or_default();

        out.push_str(&format!(
            "   {:12} │ {:>12.2} │ {:>12} │ {}\n",
            point.month_key,
            point.total_actual,
            format_amount(income),
            top
        ));
    }
    out
}
