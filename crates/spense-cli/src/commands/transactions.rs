//! Transaction command implementations

use anyhow::Result;
use spense_core::{ClientConfig, ListController, NewTransaction, TransactionType};

use super::{format_amount, list_controller, parse_date, resolve_filter, truncate};

pub async fn cmd_transactions_list(
    config: &ClientConfig,
    page: u32,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let filter = resolve_filter(from, to)?;
    let mut controller = list_controller(config, filter, false);

    if !controller.load().await {
        anyhow::bail!("Could not load transactions from {}", config.api_url);
    }
    if page > 0 && !controller.request_page(page).await {
        println!(
            "Page {} is out of range ({} page(s) available).",
            page,
            controller.total_pages()
        );
        return Ok(());
    }

    if controller.rows().is_empty() {
        println!("No transactions found in this range. Add one with:");
        println!("  spense transactions add --amount 9.50 --type expense");
        return Ok(());
    }

    println!();
    println!("📝 Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in controller.rows() {
        println!(
            "   [{}] {} │ {:>10} │ {:<14} │ {}",
            tx.id,
            tx.date,
            format_amount(tx.amount, tx.transaction_type == TransactionType::Income),
            truncate(tx.category_name(), 14),
            truncate(tx.description.as_deref().unwrap_or(""), 32)
        );
    }

    println!();
    println!(
        "   Page {} of {}",
        controller.current_page() + 1,
        controller.total_pages()
    );

    Ok(())
}

pub async fn cmd_transactions_add(
    config: &ClientConfig,
    amount: f64,
    type_flag: &str,
    date: Option<&str>,
    description: Option<String>,
    category: Option<String>,
) -> Result<()> {
    if amount < 0.0 {
        anyhow::bail!("Amount must be non-negative; the type determines the sign");
    }
    let transaction_type: TransactionType = type_flag
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let date = match date {
        Some(raw) => parse_date(raw)?,
        None => chrono::Local::now().date_naive(),
    };

    let filter = resolve_filter(None, None)?;
    let mut controller = list_controller(config, filter, false);
    if !controller.load().await {
        anyhow::bail!("Could not reach the API at {}", config.api_url);
    }

    let added = controller
        .create_transaction(NewTransaction {
            amount,
            description,
            date,
            category,
            transaction_type,
        })
        .await;
    if !added {
        anyhow::bail!("Transaction was not added");
    }
    Ok(())
}

pub async fn cmd_transactions_delete(config: &ClientConfig, id: i64, yes: bool) -> Result<()> {
    let filter = resolve_filter(None, None)?;
    let mut controller = list_controller(config, filter, yes);
    if !controller.load().await {
        anyhow::bail!("Could not reach the API at {}", config.api_url);
    }
    if !controller.delete_transaction(id).await {
        anyhow::bail!("Transaction {} was not deleted", id);
    }
    Ok(())
}

pub async fn cmd_transactions_set_category(
    config: &ClientConfig,
    id: i64,
    name: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let filter = resolve_filter(from, to)?;
    let mut controller = list_controller(config, filter, false);
    if !controller.load().await {
        anyhow::bail!("Could not reach the API at {}", config.api_url);
    }

    if !find_row(&mut controller, id).await {
        anyhow::bail!(
            "Transaction {} not found in the filter range (try --from/--to)",
            id
        );
    }

    controller.begin_category_edit(id)?;
    controller.select_pending_category(name)?;
    if !controller.commit_category_edit().await {
        anyhow::bail!("Category was not updated");
    }
    Ok(())
}

/// Page through the list until the row is visible
async fn find_row(controller: &mut ListController, id: i64) -> bool {
    loop {
        if controller.rows().iter().any(|t| t.id == id) {
            return true;
        }
        let next = controller.current_page() + 1;
        if next >= controller.total_pages() || !controller.request_page(next).await {
            return false;
        }
    }
}
