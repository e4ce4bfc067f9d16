//! CSV export and import against the API
//!
//! The CSV column format is the server's contract; bytes move through
//! here unparsed. Export validates the date range client-side before
//! any request goes out, and import bumps the refresh signal so every
//! dependent view re-fetches.

use std::path::Path;

use tracing::info;

use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::filter::DateFilter;
use crate::refresh::RefreshSignal;

/// Download transactions in the range to a local CSV file
///
/// Requires a complete filter (both dates); rejected before any
/// request otherwise.
pub async fn export_to_file(
    client: &ApiClient,
    filter: &DateFilter,
    output: &Path,
) -> Result<usize> {
    if !filter.is_complete() {
        return Err(Error::InvalidData(
            "export requires both start and end dates".to_string(),
        ));
    }
    let bytes = client.export_csv(filter).await?;
    std::fs::write(output, &bytes)?;
    info!("Exported {} bytes to {}", bytes.len(), output.display());
    Ok(bytes.len())
}

/// Upload a local CSV file, bumping the refresh signal on success
pub async fn import_from_file(
    client: &ApiClient,
    refresh: &RefreshSignal,
    input: &Path,
) -> Result<String> {
    let bytes = std::fs::read(input)?;
    let filename = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("transactions.csv");
    let summary = client.import_csv(filename, bytes).await?;
    refresh.bump();
    Ok(summary)
}
