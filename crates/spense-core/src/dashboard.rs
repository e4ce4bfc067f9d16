//! Dashboard stats controller
//!
//! Backs the stat cards and charts. Re-fetches whenever the filter
//! changes or any mutation bumps the shared refresh signal.

use crate::client::ApiClient;
use crate::error::Result;
use crate::filter::DateFilter;
use crate::models::{CategoryStat, MonthlyStat, Stats};
use crate::refresh::{RefreshListener, RefreshSignal};

/// Stat card totals plus chart data for the current filter
pub struct DashboardController {
    client: ApiClient,
    listener: RefreshListener,
    filter: DateFilter,
    stats: Stats,
}

impl DashboardController {
    pub fn new(client: ApiClient, filter: DateFilter, refresh: &RefreshSignal) -> Self {
        Self {
            client,
            listener: refresh.listen(),
            filter,
            stats: Stats::default(),
        }
    }

    /// Fetch totals for the current filter range
    pub async fn fetch(&mut self) -> Result<&Stats> {
        self.stats = self.client.stats(&self.filter).await?;
        self.listener.take_change();
        Ok(&self.stats)
    }

    /// Replace the filter and re-fetch
    pub async fn set_filter(&mut self, filter: DateFilter) -> Result<&Stats> {
        self.filter = filter;
        self.fetch().await
    }

    /// Re-fetch if a mutation happened since the last fetch
    pub async fn sync(&mut self) -> Result<bool> {
        if self.listener.take_change() {
            self.fetch().await?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Expense totals per category for the category chart
    pub async fn chart_stats(&self) -> Result<Vec<CategoryStat>> {
        self.client.chart_stats().await
    }

    /// Monthly income/expense totals for the trend chart
    pub async fn monthly_stats(&self) -> Result<Vec<MonthlyStat>> {
        self.client.monthly_stats().await
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn filter(&self) -> &DateFilter {
        &self.filter
    }
}
