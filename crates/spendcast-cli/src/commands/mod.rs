//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (engine setup, totals loading) and the config command
//! - `reports` - Forecast, budget, history and combined report commands
//! - `artifact` - Pretrained artifact inspection

pub mod artifact;
pub mod core;
pub mod reports;

// Re-export command functions for main.rs
pub use artifact::*;
pub use core::*;
pub use reports::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an optional amount, showing a dash when absent
pub fn format_amount(amount: Option<f64>) -> String {
    match amount {
        Some(a) => format!("{:.2}", a),
        None => "-".to_string(),
    }
}
