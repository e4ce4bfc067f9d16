//! CSV export/import commands

use std::path::Path;

use anyhow::Result;
use spense_core::{transfer, ApiClient, ClientConfig, DateFilter, RefreshSignal};

use super::parse_date;

pub async fn cmd_export(config: &ClientConfig, from: &str, to: &str, output: &Path) -> Result<()> {
    // Both dates are required and validated before any request
    let filter = DateFilter::between(parse_date(from)?, parse_date(to)?)?;
    let client = ApiClient::new(&config.api_url);

    println!("Exporting {} → {} ...", from, to);
    let bytes = transfer::export_to_file(&client, &filter, output).await?;
    println!("✅ Wrote {} bytes to {}", bytes, output.display());
    Ok(())
}

pub async fn cmd_import(config: &ClientConfig, file: &Path) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }
    let client = ApiClient::new(&config.api_url);
    let refresh = RefreshSignal::new();

    println!("Uploading {} ...", file.display());
    let summary = transfer::import_from_file(&client, &refresh, file).await?;
    println!("✅ {}", summary);
    Ok(())
}
