//! Date-range filter and query parameter building
//!
//! The filter is client-local state applied to every transaction
//! fetch. Absent bounds are omitted from the query so the server
//! applies its own defaults (last 30 days).

use chrono::{Days, NaiveDate};

use crate::error::{Error, Result};

/// Inclusive date-range bounds applied to transaction queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateFilter {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateFilter {
    /// Create a filter, enforcing `start <= end` when both bounds are set
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(Error::InvalidDateRange(format!(
                    "start {} is after end {}",
                    s, e
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// Filter covering both bounds
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Self::new(Some(start), Some(end))
    }

    /// Default dashboard range: the 30 days ending today
    pub fn last_30_days(today: NaiveDate) -> Self {
        let start = today.checked_sub_days(Days::new(30)).unwrap_or(today);
        Self {
            start: Some(start),
            end: Some(today),
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// True when both bounds are present (required for CSV export)
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

/// Build the query parameters for a paginated transaction fetch
///
/// Pure mapping of `(filter, page, size)` to request parameters; no
/// side effects and no failure modes. Missing dates are simply left
/// out.
pub fn query_params(filter: &DateFilter, page: u32, size: u32) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", page.to_string()),
        ("size", size.to_string()),
    ];
    if let Some(start) = filter.start() {
        params.push(("startDate", start.to_string()));
    }
    if let Some(end) = filter.end() {
        params.push(("endDate", end.to_string()));
    }
    params
}
