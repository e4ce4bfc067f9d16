//! Category taxonomy listing

use anyhow::Result;
use spense_core::{ApiClient, ClientConfig, TransactionType};

pub async fn cmd_categories(config: &ClientConfig, type_flag: Option<&str>) -> Result<()> {
    let only: Option<TransactionType> = type_flag
        .map(|t| t.parse().map_err(|e: String| anyhow::anyhow!(e)))
        .transpose()?;

    let client = ApiClient::new(&config.api_url);
    let categories = client.list_categories().await?;

    let matching: Vec<_> = categories
        .iter()
        .filter(|c| only.map_or(true, |t| c.category_type == t))
        .collect();

    if matching.is_empty() {
        println!("No categories found.");
        return Ok(());
    }

    println!();
    println!("🏷️  Categories");
    println!("   ─────────────────────────────");
    for category in matching {
        println!(
            "   [{}] {:<16} {}",
            category.id, category.name, category.category_type
        );
    }

    Ok(())
}
