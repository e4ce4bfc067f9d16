//! Transaction list controller
//!
//! Composes the paginated fetch, the date filter, the inline category
//! edit session, and the refresh signal into the state behind the
//! transaction table:
//! - filter changes reset to page 0 before fetching
//! - page requests are clamped to the known range
//! - deleting the sole row of a non-first page steps back a page
//! - every fetch carries a sequence number so an overtaken response
//!   can never replace newer data
//!
//! API failures are converted to [`Notify`] events at the operation
//! boundary; they never propagate out of the controller, and state is
//! left unchanged (or the page position repaired) on failure.

use std::sync::Arc;

use tracing::debug;

use crate::client::ApiClient;
use crate::edit::EditSession;
use crate::error::{Error, Result};
use crate::filter::DateFilter;
use crate::models::{Category, NewTransaction, Page, Transaction, TransactionType};
use crate::refresh::{RefreshListener, RefreshSignal};

/// Sink for user-visible, non-blocking notifications
pub trait Notify: Send + Sync {
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Blocking yes/no decision, required before destructive operations
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// State and operations behind the paginated transaction table
pub struct ListController {
    client: ApiClient,
    notify: Arc<dyn Notify>,
    confirm: Arc<dyn Confirm>,
    refresh: RefreshSignal,
    listener: RefreshListener,
    filter: DateFilter,
    page_size: u32,
    current_page: u32,
    total_pages: u32,
    rows: Vec<Transaction>,
    categories: Vec<Category>,
    edit: EditSession,
    fetch_seq: u64,
}

impl ListController {
    pub fn new(
        client: ApiClient,
        filter: DateFilter,
        page_size: u32,
        refresh: RefreshSignal,
        notify: Arc<dyn Notify>,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        let listener = refresh.listen();
        Self {
            client,
            notify,
            confirm,
            refresh,
            listener,
            filter,
            page_size,
            current_page: 0,
            total_pages: 0,
            rows: Vec::new(),
            categories: Vec::new(),
            edit: EditSession::Idle,
            fetch_seq: 0,
        }
    }

    /// Initial load: category taxonomy plus the first page
    pub async fn load(&mut self) -> bool {
        self.reload_categories().await;
        self.fetch_current_page().await
    }

    /// Re-fetch the category taxonomy
    ///
    /// Categories are slow-changing; this runs at load and on explicit
    /// invalidation rather than on every list refresh.
    pub async fn reload_categories(&mut self) {
        match self.client.list_categories().await {
            Ok(categories) => self.categories = categories,
            Err(e) => {
                self.notify
                    .error(&format!("Failed to load categories: {}", e));
            }
        }
    }

    /// Replace the filter, resetting to page 0 before the next fetch
    pub async fn set_filter(&mut self, filter: DateFilter) -> bool {
        self.filter = filter;
        self.current_page = 0;
        self.fetch_current_page().await
    }

    /// Navigate to page `n`
    ///
    /// No-op when `n` is out of `[0, total_pages - 1]`, equal to the
    /// current page, or nothing has been fetched yet. If the fetch
    /// fails, the position reverts so it keeps matching the rows on
    /// display.
    pub async fn request_page(&mut self, n: u32) -> bool {
        if self.total_pages == 0 || n >= self.total_pages || n == self.current_page {
            return false;
        }
        let previous = self.current_page;
        self.current_page = n;
        if self.fetch_current_page().await {
            true
        } else {
            self.current_page = previous;
            false
        }
    }

    /// Delete a transaction after user confirmation
    ///
    /// Returns true only when the delete was confirmed and applied.
    pub async fn delete_transaction(&mut self, id: i64) -> bool {
        if !self.confirm.confirm(&format!("Delete transaction {}?", id)) {
            return false;
        }
        match self.client.delete_transaction(id).await {
            Ok(()) => {
                if self.edit.editing_id() == Some(id) {
                    self.edit.cancel();
                }
                self.refresh.bump();
                // Sole row of a non-first page: that page no longer
                // exists, so step back instead of fetching past the end
                if self.rows.len() == 1 && self.current_page > 0 {
                    self.current_page -= 1;
                }
                self.fetch_current_page().await;
                self.notify.success("Transaction deleted");
                true
            }
            Err(e) => {
                self.notify
                    .error(&format!("Failed to delete transaction: {}", e));
                false
            }
        }
    }

    /// Create a transaction, then re-fetch the current page
    pub async fn create_transaction(&mut self, new: NewTransaction) -> bool {
        if let Some(name) = new.category.as_deref() {
            if let Err(e) = self.check_category(new.transaction_type, name) {
                self.notify.error(&e.to_string());
                return false;
            }
        }
        match self.client.create_transaction(&new).await {
            Ok(created) => {
                self.refresh.bump();
                self.fetch_current_page().await;
                self.notify
                    .success(&format!("Added transaction {}", created.id));
                true
            }
            Err(e) => {
                self.notify
                    .error(&format!("Failed to add transaction: {}", e));
                false
            }
        }
    }

    /// Begin an inline category edit for a visible row
    ///
    /// An active session on another row is implicitly cancelled.
    pub fn begin_category_edit(&mut self, id: i64) -> Result<()> {
        let row = self
            .rows
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("transaction {} is not on this page", id)))?;
        let current = row.category.as_ref().map(|c| c.name.clone());
        self.edit.begin(id, current.as_deref());
        Ok(())
    }

    /// Replace the pending category name for the active session
    ///
    /// The name must belong to a category matching the row's type.
    pub fn select_pending_category(&mut self, name: &str) -> Result<()> {
        let id = self
            .edit
            .editing_id()
            .ok_or_else(|| Error::InvalidData("no category edit in progress".to_string()))?;
        let row_type = self
            .rows
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.transaction_type)
            .ok_or_else(|| Error::NotFound(format!("transaction {} is not on this page", id)))?;
        self.check_category(row_type, name)?;
        self.edit.set_pending(name);
        Ok(())
    }

    /// Discard the active edit session without a network call
    pub fn cancel_category_edit(&mut self) {
        self.edit.cancel();
    }

    /// Commit the active edit session
    ///
    /// Issues exactly one category update on success. On failure the
    /// session is restored with the pending value intact so the user
    /// can retry.
    pub async fn commit_category_edit(&mut self) -> bool {
        let Some((id, pending)) = self.edit.take() else {
            self.notify.error("No category edit in progress");
            return false;
        };
        let row_type = match self.rows.iter().find(|t| t.id == id) {
            Some(row) => row.transaction_type,
            None => {
                self.notify
                    .error(&format!("Transaction {} is no longer on this page", id));
                return false;
            }
        };
        if let Err(e) = self.check_category(row_type, &pending) {
            self.notify.error(&e.to_string());
            self.edit.begin(id, Some(&pending));
            return false;
        }
        match self.client.update_category(id, &pending).await {
            Ok(()) => {
                self.refresh.bump();
                self.fetch_current_page().await;
                self.notify
                    .success(&format!("Category set to {}", pending));
                true
            }
            Err(e) => {
                self.notify
                    .error(&format!("Failed to update category: {}", e));
                self.edit.begin(id, Some(&pending));
                false
            }
        }
    }

    /// Re-fetch if another view bumped the refresh signal
    pub async fn sync(&mut self) -> bool {
        if self.listener.take_change() {
            self.fetch_current_page().await
        } else {
            false
        }
    }

    /// Categories valid for the given transaction type
    ///
    /// Pure local partition of the fetched taxonomy; never a network
    /// call per row.
    pub fn categories_for(&self, transaction_type: TransactionType) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| c.category_type == transaction_type)
            .collect()
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn filter(&self) -> &DateFilter {
        &self.filter
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.edit
    }

    pub fn refresh_signal(&self) -> &RefreshSignal {
        &self.refresh
    }

    fn check_category(&self, row_type: TransactionType, name: &str) -> Result<()> {
        // Taxonomy never loaded (or genuinely empty): defer to the
        // server instead of rejecting every categorized mutation
        if self.categories.is_empty() {
            return Ok(());
        }
        let valid = self
            .categories
            .iter()
            .any(|c| c.category_type == row_type && c.name == name);
        if valid {
            Ok(())
        } else {
            Err(Error::InvalidData(format!(
                "{} is not a {} category",
                name, row_type
            )))
        }
    }

    /// Fetch the page at `current_page`, last-request-wins
    ///
    /// Each attempt takes a new sequence number; a completion that is
    /// no longer the latest is discarded without touching state. When
    /// the server reports fewer pages than the current position (a
    /// mutation shrank the result set) the position is stepped back
    /// and the fetch repeated.
    async fn fetch_current_page(&mut self) -> bool {
        loop {
            let seq = self.next_fetch_seq();
            let result = self
                .client
                .list_transactions(&self.filter, self.current_page, self.page_size)
                .await;
            match result {
                Ok(page) => {
                    if !self.apply_page(seq, page) {
                        return false;
                    }
                    if self.total_pages > 0 && self.current_page >= self.total_pages {
                        self.current_page = self.total_pages - 1;
                        continue;
                    }
                    // Absorb our own bump so sync() only reacts to others
                    self.listener.take_change();
                    return true;
                }
                Err(e) => {
                    if seq == self.fetch_seq {
                        self.notify
                            .error(&format!("Failed to load transactions: {}", e));
                    }
                    // Keep rows and total_pages untouched; a stale
                    // total would trap the user on an unreachable page
                    return false;
                }
            }
        }
    }

    fn next_fetch_seq(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.fetch_seq
    }

    /// Install a fetched page unless a newer fetch was issued meanwhile
    fn apply_page(&mut self, seq: u64, page: Page<Transaction>) -> bool {
        if seq != self.fetch_seq {
            debug!("discarding overtaken fetch {} (latest {})", seq, self.fetch_seq);
            return false;
        }
        self.total_pages = page.total_pages;
        self.rows = page.items;
        true
    }
}
