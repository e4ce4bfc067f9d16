//! Test utilities for spense-core
//!
//! Provides a mock Spense API server with an in-memory transaction
//! store, plus recording doubles for the `Notify` and `Confirm`
//! seams. Used by the integration tests and available to downstream
//! crates via the `test-utils` feature.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{Datelike, Days, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::oneshot;

use crate::controller::{Confirm, Notify};
use crate::models::{Category, Transaction, TransactionType};

/// In-memory backend state behind the mock server
#[derive(Default)]
pub struct ApiState {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    next_id: i64,
    /// Serve `page.totalPages` instead of the flat envelope
    pub nested_page_envelope: bool,
    /// Fail the next request with this status (one-shot)
    pub fail_next: Option<u16>,
    /// Every applied category update, in order
    pub category_updates: Vec<(i64, String)>,
}

type SharedState = Arc<Mutex<ApiState>>;

/// Mock Spense API server for tests
pub struct MockApiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    state: SharedState,
}

impl MockApiServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state: SharedState = Arc::new(Mutex::new(ApiState {
            next_id: 1,
            ..Default::default()
        }));

        let app = Router::new()
            .route("/api/transactions", get(handle_list).post(handle_create))
            .route("/api/transactions/:id", delete(handle_delete))
            .route("/api/transactions/:id/category", put(handle_update_category))
            .route("/api/transactions/stats", get(handle_stats))
            .route("/api/transactions/stats/chart", get(handle_chart_stats))
            .route("/api/transactions/stats/monthly", get(handle_monthly_stats))
            .route("/api/transactions/export", get(handle_export))
            .route("/api/transactions/import", post(handle_import))
            .route("/api/categories", get(handle_categories))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            state,
        }
    }

    /// Base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Add a category to the taxonomy
    pub fn seed_category(&self, name: &str, category_type: TransactionType) {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        state.categories.push(Category {
            id,
            name: name.to_string(),
            category_type,
        });
    }

    /// Add a transaction, resolving the category by name
    pub fn seed_transaction(
        &self,
        date: NaiveDate,
        amount: f64,
        transaction_type: TransactionType,
        category: Option<&str>,
    ) -> i64 {
        let mut state = self.state.lock().unwrap();
        let category = category.map(|name| {
            state
                .categories
                .iter()
                .find(|c| c.name == name && c.category_type == transaction_type)
                .cloned()
                .expect("seeded category must exist")
        });
        let id = state.next_id;
        state.next_id += 1;
        state.transactions.push(Transaction {
            id,
            date,
            description: Some(format!("tx {}", id)),
            amount,
            transaction_type,
            category,
        });
        id
    }

    /// Fail the next request with the given status
    pub fn fail_next_request(&self, status: u16) {
        self.state.lock().unwrap().fail_next = Some(status);
    }

    /// Switch the list endpoint to the nested `page.totalPages` envelope
    pub fn use_nested_page_envelope(&self) {
        self.state.lock().unwrap().nested_page_envelope = true;
    }

    /// Category updates applied so far, in order
    pub fn category_updates(&self) -> Vec<(i64, String)> {
        self.state.lock().unwrap().category_updates.clone()
    }

    /// Number of transactions currently stored
    pub fn transaction_count(&self) -> usize {
        self.state.lock().unwrap().transactions.len()
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn take_injected_failure(state: &SharedState) -> Option<Response> {
    let status = state.lock().unwrap().fail_next.take()?;
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Some((status, Json(json!({"message": "injected failure"}))).into_response())
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"message": message}))).into_response()
}

#[derive(Deserialize)]
struct ListParams {
    #[serde(default)]
    page: u32,
    #[serde(default = "default_page_size")]
    size: u32,
    #[serde(rename = "startDate")]
    start_date: Option<NaiveDate>,
    #[serde(rename = "endDate")]
    end_date: Option<NaiveDate>,
}

fn default_page_size() -> u32 {
    10
}

/// Resolve the date range, defaulting to the last 30 days like the
/// real backend
fn resolve_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    let today = chrono::Local::now().date_naive();
    let end = end.unwrap_or(today);
    let start = start.unwrap_or_else(|| today.checked_sub_days(Days::new(30)).unwrap_or(today));
    (start, end)
}

fn in_range(state: &ApiState, start: NaiveDate, end: NaiveDate) -> Vec<Transaction> {
    let mut matching: Vec<Transaction> = state
        .transactions
        .iter()
        .filter(|t| t.date >= start && t.date <= end)
        .cloned()
        .collect();
    // Date descending, id descending as tiebreaker
    matching.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    matching
}

async fn handle_list(State(state): State<SharedState>, Query(params): Query<ListParams>) -> Response {
    if let Some(failure) = take_injected_failure(&state) {
        return failure;
    }
    if params.size == 0 {
        return error(StatusCode::BAD_REQUEST, "size must be greater than 0");
    }
    let (start, end) = resolve_range(params.start_date, params.end_date);
    let state = state.lock().unwrap();
    let matching = in_range(&state, start, end);
    let total_pages = (matching.len() as u32).div_ceil(params.size);
    let offset = (params.page * params.size) as usize;
    let content: Vec<&Transaction> = matching
        .iter()
        .skip(offset)
        .take(params.size as usize)
        .collect();
    let body = if state.nested_page_envelope {
        json!({"content": content, "page": {"totalPages": total_pages}})
    } else {
        json!({"content": content, "totalPages": total_pages})
    };
    Json(body).into_response()
}

#[derive(Deserialize)]
struct CreateBody {
    amount: f64,
    description: Option<String>,
    date: NaiveDate,
    category: Option<String>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
}

async fn handle_create(State(state): State<SharedState>, Json(body): Json<CreateBody>) -> Response {
    if let Some(failure) = take_injected_failure(&state) {
        return failure;
    }
    let mut state = state.lock().unwrap();
    let category = match body.category {
        Some(name) => {
            let found = state
                .categories
                .iter()
                .find(|c| c.name == name && c.category_type == body.transaction_type)
                .cloned();
            match found {
                Some(c) => Some(c),
                None => return error(StatusCode::BAD_REQUEST, &format!("Unknown category: {}", name)),
            }
        }
        None => None,
    };
    let id = state.next_id;
    state.next_id += 1;
    let transaction = Transaction {
        id,
        date: body.date,
        description: body.description,
        amount: body.amount,
        transaction_type: body.transaction_type,
        category,
    };
    state.transactions.push(transaction.clone());
    (StatusCode::CREATED, Json(transaction)).into_response()
}

async fn handle_delete(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    if let Some(failure) = take_injected_failure(&state) {
        return failure;
    }
    let mut state = state.lock().unwrap();
    let before = state.transactions.len();
    state.transactions.retain(|t| t.id != id);
    if state.transactions.len() == before {
        return error(StatusCode::NOT_FOUND, &format!("Transaction {} not found", id));
    }
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Deserialize)]
struct UpdateCategoryParams {
    #[serde(rename = "newCategoryName")]
    new_category_name: String,
}

async fn handle_update_category(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Query(params): Query<UpdateCategoryParams>,
) -> Response {
    if let Some(failure) = take_injected_failure(&state) {
        return failure;
    }
    let mut state = state.lock().unwrap();
    let row_type = match state.transactions.iter().find(|t| t.id == id) {
        Some(t) => t.transaction_type,
        None => return error(StatusCode::NOT_FOUND, &format!("Transaction {} not found", id)),
    };
    let category = state
        .categories
        .iter()
        .find(|c| c.name == params.new_category_name && c.category_type == row_type)
        .cloned();
    let Some(category) = category else {
        return error(
            StatusCode::BAD_REQUEST,
            &format!("Unknown category: {}", params.new_category_name),
        );
    };
    state.category_updates.push((id, category.name.clone()));
    let row = state.transactions.iter_mut().find(|t| t.id == id).unwrap();
    row.category = Some(category);
    StatusCode::OK.into_response()
}

async fn handle_categories(State(state): State<SharedState>) -> Response {
    if let Some(failure) = take_injected_failure(&state) {
        return failure;
    }
    let state = state.lock().unwrap();
    Json(state.categories.clone()).into_response()
}

#[derive(Deserialize)]
struct RangeParams {
    #[serde(rename = "startDate")]
    start_date: Option<NaiveDate>,
    #[serde(rename = "endDate")]
    end_date: Option<NaiveDate>,
}

async fn handle_stats(State(state): State<SharedState>, Query(params): Query<RangeParams>) -> Response {
    if let Some(failure) = take_injected_failure(&state) {
        return failure;
    }
    let (start, end) = resolve_range(params.start_date, params.end_date);
    let state = state.lock().unwrap();
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    for t in in_range(&state, start, end) {
        match t.transaction_type {
            TransactionType::Income => total_income += t.amount,
            TransactionType::Expense => total_expense += t.amount,
        }
    }
    Json(json!({
        "totalIncome": total_income,
        "totalExpense": total_expense,
        "balance": total_income - total_expense,
    }))
    .into_response()
}

async fn handle_chart_stats(State(state): State<SharedState>) -> Response {
    if let Some(failure) = take_injected_failure(&state) {
        return failure;
    }
    let state = state.lock().unwrap();
    let mut totals: Vec<(String, f64)> = Vec::new();
    for t in &state.transactions {
        if t.transaction_type != TransactionType::Expense {
            continue;
        }
        let name = t.category_name().to_string();
        match totals.iter_mut().find(|(n, _)| *n == name) {
            Some((_, total)) => *total += t.amount,
            None => totals.push((name, t.amount)),
        }
    }
    let body: Vec<_> = totals
        .into_iter()
        .map(|(name, total)| json!({"categoryName": name, "totalAmount": total}))
        .collect();
    Json(body).into_response()
}

const MONTH_ABBREVS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

async fn handle_monthly_stats(State(state): State<SharedState>) -> Response {
    if let Some(failure) = take_injected_failure(&state) {
        return failure;
    }
    let state = state.lock().unwrap();
    let mut months: Vec<(u32, f64, f64)> = Vec::new();
    for t in &state.transactions {
        let month = t.date.month();
        if !months.iter().any(|(m, _, _)| *m == month) {
            months.push((month, 0.0, 0.0));
        }
        let entry = months.iter_mut().find(|(m, _, _)| *m == month).unwrap();
        match t.transaction_type {
            TransactionType::Income => entry.1 += t.amount,
            TransactionType::Expense => entry.2 += t.amount,
        }
    }
    months.sort_by_key(|(m, _, _)| *m);
    let body: Vec<_> = months
        .into_iter()
        .map(|(m, income, expense)| {
            json!({
                "month": MONTH_ABBREVS[(m - 1) as usize],
                "income": income,
                "expense": expense,
            })
        })
        .collect();
    Json(body).into_response()
}

#[derive(Deserialize)]
struct ExportParams {
    #[serde(rename = "startDate")]
    start_date: NaiveDate,
    #[serde(rename = "endDate")]
    end_date: NaiveDate,
}

async fn handle_export(State(state): State<SharedState>, Query(params): Query<ExportParams>) -> Response {
    if let Some(failure) = take_injected_failure(&state) {
        return failure;
    }
    let state = state.lock().unwrap();
    let mut csv = String::from("Date,Category,Description,Type,Amount\n");
    for t in in_range(&state, params.start_date, params.end_date) {
        csv.push_str(&format!(
            "{},{},\"{}\",{},{}\n",
            t.date,
            t.category_name(),
            t.description.as_deref().unwrap_or(""),
            t.transaction_type,
            t.amount
        ));
    }
    ([("content-type", "text/csv")], csv).into_response()
}

async fn handle_import(State(state): State<SharedState>, mut multipart: Multipart) -> Response {
    if let Some(failure) = take_injected_failure(&state) {
        return failure;
    }
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let bytes = match field.bytes().await {
                Ok(b) => b,
                Err(_) => return error(StatusCode::BAD_REQUEST, "Unreadable upload"),
            };
            let rows = String::from_utf8_lossy(&bytes)
                .lines()
                .skip(1)
                .filter(|l| !l.trim().is_empty())
                .count();
            return format!("Imported {} transactions", rows).into_response();
        }
    }
    error(StatusCode::BAD_REQUEST, "Missing file field")
}

// ---------------------------------------------------------------------------
// Notify / Confirm test doubles
// ---------------------------------------------------------------------------

/// A recorded notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyEvent {
    Info(String),
    Success(String),
    Error(String),
}

/// `Notify` implementation that records every event
#[derive(Default)]
pub struct RecordingNotify {
    events: Mutex<Vec<NotifyEvent>>,
}

impl RecordingNotify {
    pub fn events(&self) -> Vec<NotifyEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                NotifyEvent::Error(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                NotifyEvent::Success(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }
}

impl Notify for RecordingNotify {
    fn info(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(NotifyEvent::Info(message.to_string()));
    }

    fn success(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(NotifyEvent::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(NotifyEvent::Error(message.to_string()));
    }
}

/// `Confirm` implementation with a fixed answer
pub struct StaticConfirm(pub bool);

impl Confirm for StaticConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
