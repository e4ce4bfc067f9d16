//! Spense Core Library
//!
//! Client-side logic for the Spense finance dashboard:
//! - Typed REST API client (transactions, categories, stats, CSV transfer)
//! - Transaction list controller (pagination, filtering, inline category edit)
//! - Refresh signal shared by every data-dependent view
//! - Dashboard stats controller for the stat cards and charts
//! - Client configuration loading

pub mod client;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod edit;
pub mod error;
pub mod filter;
pub mod models;
pub mod refresh;
pub mod transfer;

/// Test utilities including the mock API server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use controller::{Confirm, ListController, Notify};
pub use dashboard::DashboardController;
pub use edit::{EditSession, DEFAULT_PENDING_CATEGORY};
pub use error::{Error, Result};
pub use filter::{query_params, DateFilter};
pub use models::{
    Category, CategoryStat, MonthlyStat, NewTransaction, Page, Stats, Transaction, TransactionType,
};
pub use refresh::{RefreshListener, RefreshSignal};
