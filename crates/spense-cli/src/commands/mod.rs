//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `dashboard` - Stat cards and chart summaries
//! - `transactions` - Transaction commands (list, add, delete, set-category)
//! - `categories` - Category taxonomy listing
//! - `transfer` - CSV export/import commands

pub mod categories;
pub mod dashboard;
pub mod transactions;
pub mod transfer;

// Re-export command functions for main.rs
pub use categories::*;
pub use dashboard::*;
pub use transactions::*;
pub use transfer::*;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use spense_core::{ApiClient, ClientConfig, Confirm, DateFilter, ListController, Notify, RefreshSignal};

/// Resolve config from file/env, then apply the --api-url flag
pub fn load_config(api_url: Option<&str>) -> Result<ClientConfig> {
    let config = ClientConfig::load()?;
    Ok(match api_url {
        Some(url) => config.with_api_url(url),
        None => config,
    })
}

/// Parse a YYYY-MM-DD CLI date flag
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", raw))
}

/// Build the filter from optional --from/--to flags
///
/// Defaults to the 30 days ending today when neither flag is given,
/// matching the server's own default window.
pub fn resolve_filter(from: Option<&str>, to: Option<&str>) -> Result<DateFilter> {
    if from.is_none() && to.is_none() {
        return Ok(DateFilter::last_30_days(chrono::Local::now().date_naive()));
    }
    let start = from.map(parse_date).transpose()?;
    let end = to.map(parse_date).transpose()?;
    Ok(DateFilter::new(start, end)?)
}

/// Build a list controller wired to the terminal seams
pub fn list_controller(config: &ClientConfig, filter: DateFilter, assume_yes: bool) -> ListController {
    ListController::new(
        ApiClient::new(&config.api_url),
        filter,
        config.page_size,
        RefreshSignal::new(),
        Arc::new(TermNotify),
        Arc::new(StdinConfirm { assume_yes }),
    )
}

/// Notifications printed to the terminal
pub struct TermNotify;

impl Notify for TermNotify {
    fn info(&self, message: &str) {
        println!("   {}", message);
    }

    fn success(&self, message: &str) {
        println!("✅ {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }
}

/// Yes/no prompt on stdin; `--yes` answers without asking
pub struct StdinConfirm {
    pub assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", prompt);
        let _ = std::io::stdout().flush();
        let mut answer = String::new();
        if std::io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// Truncate a string to a maximum length, adding "..." if truncated
///
/// Counts chars, not bytes, so multibyte text never splits mid-character.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Amount column with the sign implied by the transaction type
pub fn format_amount(amount: f64, income: bool) -> String {
    if income {
        format!("\x1b[32m+${:.2}\x1b[0m", amount) // Green for income
    } else {
        format!("\x1b[31m-${:.2}\x1b[0m", amount) // Red for expenses
    }
}
