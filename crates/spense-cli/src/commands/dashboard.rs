//! Dashboard command: stat cards plus chart summaries

use anyhow::Result;
use spense_core::{ApiClient, ClientConfig, DashboardController, RefreshSignal};

use super::resolve_filter;

pub async fn cmd_dashboard(
    config: &ClientConfig,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let filter = resolve_filter(from, to)?;
    let refresh = RefreshSignal::new();
    let mut dashboard = DashboardController::new(ApiClient::new(&config.api_url), filter, &refresh);

    let stats = dashboard.fetch().await?;

    println!();
    println!("💰 Dashboard");
    match (filter.start(), filter.end()) {
        (Some(start), Some(end)) => println!("   {} → {}", start, end),
        _ => println!("   (server default range)"),
    }
    println!("   ─────────────────────────────────────────────");
    println!("   Income:    \x1b[32m+${:.2}\x1b[0m", stats.total_income);
    println!("   Expenses:  \x1b[31m-${:.2}\x1b[0m", stats.total_expense);
    println!("   Balance:    ${:.2}", stats.balance);

    let chart = dashboard.chart_stats().await?;
    if !chart.is_empty() {
        println!();
        println!("   Spending by category");
        let max = chart
            .iter()
            .map(|c| c.total_amount)
            .fold(0.0_f64, f64::max)
            .max(1.0);
        for stat in &chart {
            let bar_len = ((stat.total_amount / max) * 24.0).round() as usize;
            println!(
                "   {:<14} {:<24} ${:.2}",
                super::truncate(&stat.category_name, 14),
                "█".repeat(bar_len.max(1)),
                stat.total_amount
            );
        }
    }

    let monthly = dashboard.monthly_stats().await?;
    if !monthly.is_empty() {
        println!();
        println!("   Monthly trend");
        for stat in &monthly {
            println!(
                "   {} │ +${:.2} / -${:.2}",
                stat.month, stat.income, stat.expense
            );
        }
    }

    Ok(())
}
