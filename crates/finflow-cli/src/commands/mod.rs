//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analytics` - Summary and anomaly reports
//! - `core` - Init and shared utilities (open_db, load_config)
//! - `import` - Statement import and single-transaction add
//! - `serve` - Web server command
//! - `transactions` - Transaction listing and category preview

pub mod analytics;
pub mod core;
pub mod import;
pub mod serve;
pub mod transactions;

// Re-export command functions for main.rs
pub use analytics::*;
pub use core::*;
pub use import::*;
pub use serve::*;
pub use transactions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Colored amount with currency: red for expenses, green for income
pub fn format_amount(amount: f64, currency: &str) -> String {
    if amount < 0.0 {
        format!("\x1b[31m-{:.2} {}\x1b[0m", amount.abs(), currency)
    } else {
        format!("\x1b[32m+{:.2} {}\x1b[0m", amount, currency)
    }
}
