//! HTTP client for the Spense REST API
//!
//! Thin typed wrapper over reqwest. Each method maps to one endpoint;
//! non-2xx responses are converted to `Error::Api` carrying whatever
//! detail the server returned, so callers can surface it to the user.

use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::{query_params, DateFilter};
use crate::models::{
    Category, CategoryStat, MonthlyStat, NewTransaction, Page, PageEnvelope, Stats, Transaction,
};

/// Client for the Spense REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given API base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from the SPENSE_API_URL environment variable
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("SPENSE_API_URL").ok()?;
        Some(Self::new(&url))
    }

    /// API base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch one page of transactions matching the filter
    ///
    /// Accepts both known page envelopes (flat `totalPages` and
    /// nested `page.totalPages`).
    pub async fn list_transactions(
        &self,
        filter: &DateFilter,
        page: u32,
        size: u32,
    ) -> Result<Page<Transaction>> {
        debug!("GET /api/transactions page={} size={}", page, size);
        let response = self
            .http_client
            .get(self.url("/api/transactions"))
            .query(&query_params(filter, page, size))
            .send()
            .await?;
        let response = check_status(response).await?;
        let envelope: PageEnvelope<Transaction> = response.json().await?;
        Page::from_envelope(envelope)
    }

    /// Create a transaction, returning the server-assigned entity
    pub async fn create_transaction(&self, new: &NewTransaction) -> Result<Transaction> {
        debug!("POST /api/transactions");
        let response = self
            .http_client
            .post(self.url("/api/transactions"))
            .json(new)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Delete a transaction by id
    pub async fn delete_transaction(&self, id: i64) -> Result<()> {
        debug!("DELETE /api/transactions/{}", id);
        let response = self
            .http_client
            .delete(self.url(&format!("/api/transactions/{}", id)))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Change a transaction's category by name
    pub async fn update_category(&self, id: i64, new_category_name: &str) -> Result<()> {
        debug!("PUT /api/transactions/{}/category", id);
        let response = self
            .http_client
            .put(self.url(&format!("/api/transactions/{}/category", id)))
            .query(&[("newCategoryName", new_category_name)])
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Fetch the full category taxonomy (both types)
    ///
    /// Consumers partition the result by type locally; there is never
    /// a per-row category request.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        debug!("GET /api/categories");
        let response = self
            .http_client
            .get(self.url("/api/categories"))
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch stat card totals for the filter range
    pub async fn stats(&self, filter: &DateFilter) -> Result<Stats> {
        debug!("GET /api/transactions/stats");
        let mut params = Vec::new();
        if let Some(start) = filter.start() {
            params.push(("startDate", start.to_string()));
        }
        if let Some(end) = filter.end() {
            params.push(("endDate", end.to_string()));
        }
        let response = self
            .http_client
            .get(self.url("/api/transactions/stats"))
            .query(&params)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch expense totals per category for the category chart
    pub async fn chart_stats(&self) -> Result<Vec<CategoryStat>> {
        debug!("GET /api/transactions/stats/chart");
        let response = self
            .http_client
            .get(self.url("/api/transactions/stats/chart"))
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch income/expense totals per month for the trend chart
    pub async fn monthly_stats(&self) -> Result<Vec<MonthlyStat>> {
        debug!("GET /api/transactions/stats/monthly");
        let response = self
            .http_client
            .get(self.url("/api/transactions/stats/monthly"))
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Download transactions in the range as CSV bytes
    ///
    /// Both dates are required; this is validated before any request
    /// is issued.
    pub async fn export_csv(&self, filter: &DateFilter) -> Result<Vec<u8>> {
        let (start, end) = match (filter.start(), filter.end()) {
            (Some(s), Some(e)) => (s, e),
            _ => {
                return Err(Error::InvalidData(
                    "export requires both start and end dates".to_string(),
                ))
            }
        };
        debug!("GET /api/transactions/export");
        let response = self
            .http_client
            .get(self.url("/api/transactions/export"))
            .query(&[
                ("startDate", start.to_string()),
                ("endDate", end.to_string()),
            ])
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Upload a CSV file of transactions, returning the server's summary
    pub async fn import_csv(&self, filename: &str, bytes: Vec<u8>) -> Result<String> {
        debug!("POST /api/transactions/import ({} bytes)", bytes.len());
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("text/csv")?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self
            .http_client
            .post(self.url("/api/transactions/import"))
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.text().await?)
    }
}

/// Map non-2xx responses to `Error::Api`, keeping server detail when present
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Api {
        status: status.as_u16(),
        message: extract_message(status, &body),
    })
}

/// Pull a human-readable message out of an error body
///
/// Handles `{"message": ...}` / `{"error": ...}` JSON bodies, plain
/// text bodies, and empty bodies (falls back to the status reason).
fn extract_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                if !msg.is_empty() {
                    return msg.to_string();
                }
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
