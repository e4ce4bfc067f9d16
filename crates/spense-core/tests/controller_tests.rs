//! Integration tests for the transaction list controller
//!
//! Every test runs against the in-memory mock API server, with
//! recording doubles on the notification and confirmation seams.

use std::sync::Arc;

use chrono::NaiveDate;

use spense_core::test_utils::{MockApiServer, RecordingNotify, StaticConfirm};
use spense_core::{
    ApiClient, DashboardController, DateFilter, ListController, NewTransaction, RefreshSignal,
    TransactionType,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn january() -> DateFilter {
    DateFilter::between(date(2024, 1, 1), date(2024, 1, 31)).unwrap()
}

/// Mock server with the standard category taxonomy
async fn server_with_categories() -> MockApiServer {
    let server = MockApiServer::start().await;
    server.seed_category("Salary", TransactionType::Income);
    server.seed_category("Food", TransactionType::Expense);
    server.seed_category("Transport", TransactionType::Expense);
    server
}

/// Seed `n` expense transactions spread over January 2024
fn seed_january_expenses(server: &MockApiServer, n: u32) -> Vec<i64> {
    (1..=n)
        .map(|day| {
            server.seed_transaction(
                date(2024, 1, day),
                10.0,
                TransactionType::Expense,
                Some("Food"),
            )
        })
        .collect()
}

struct Harness {
    notify: Arc<RecordingNotify>,
    controller: ListController,
}

fn harness(server: &MockApiServer, page_size: u32, confirm: bool) -> Harness {
    let notify = Arc::new(RecordingNotify::default());
    let controller = ListController::new(
        ApiClient::new(&server.url()),
        january(),
        page_size,
        RefreshSignal::new(),
        notify.clone(),
        Arc::new(StaticConfirm(confirm)),
    );
    Harness { notify, controller }
}

#[tokio::test]
async fn twelve_transactions_paginate_into_three_pages() {
    let server = server_with_categories().await;
    seed_january_expenses(&server, 12);
    let mut h = harness(&server, 5, true);

    assert!(h.controller.load().await);
    assert_eq!(h.controller.rows().len(), 5);
    assert_eq!(h.controller.total_pages(), 3);

    assert!(h.controller.request_page(2).await);
    assert_eq!(h.controller.rows().len(), 2);
    assert_eq!(h.controller.current_page(), 2);
}

#[tokio::test]
async fn filter_change_resets_to_page_zero() {
    let server = server_with_categories().await;
    seed_january_expenses(&server, 12);
    let mut h = harness(&server, 5, true);

    h.controller.load().await;
    h.controller.request_page(2).await;
    assert_eq!(h.controller.current_page(), 2);

    let narrower = DateFilter::between(date(2024, 1, 1), date(2024, 1, 7)).unwrap();
    assert!(h.controller.set_filter(narrower).await);
    assert_eq!(h.controller.current_page(), 0);
    assert_eq!(h.controller.rows().len(), 5);
    assert_eq!(h.controller.total_pages(), 2);
}

#[tokio::test]
async fn request_page_is_a_noop_outside_the_known_range() {
    let server = server_with_categories().await;
    seed_january_expenses(&server, 12);
    let mut h = harness(&server, 5, true);

    // Nothing fetched yet: no pages are known
    assert!(!h.controller.request_page(1).await);

    h.controller.load().await;
    assert!(!h.controller.request_page(3).await);
    assert!(!h.controller.request_page(99).await);
    assert!(!h.controller.request_page(0).await); // already current
    assert_eq!(h.controller.current_page(), 0);

    assert!(h.controller.request_page(1).await);
    assert!(!h.controller.request_page(1).await);
}

#[tokio::test]
async fn deleting_sole_row_of_last_page_steps_back_a_page() {
    let server = server_with_categories().await;
    let ids = seed_january_expenses(&server, 11);
    let mut h = harness(&server, 5, true);

    h.controller.load().await;
    assert_eq!(h.controller.total_pages(), 3);
    h.controller.request_page(2).await;
    assert_eq!(h.controller.rows().len(), 1);
    let last_id = h.controller.rows()[0].id;
    assert!(ids.contains(&last_id));

    assert!(h.controller.delete_transaction(last_id).await);
    assert_eq!(h.controller.current_page(), 1);
    assert_eq!(h.controller.total_pages(), 2);
    assert_eq!(h.controller.rows().len(), 5);
}

#[tokio::test]
async fn deleting_the_only_row_on_page_zero_stays_on_page_zero() {
    let server = server_with_categories().await;
    seed_january_expenses(&server, 1);
    let mut h = harness(&server, 5, true);

    h.controller.load().await;
    let id = h.controller.rows()[0].id;
    assert!(h.controller.delete_transaction(id).await);
    assert_eq!(h.controller.current_page(), 0);
    assert!(h.controller.rows().is_empty());
    assert_eq!(h.controller.total_pages(), 0);
}

#[tokio::test]
async fn unconfirmed_delete_issues_no_request() {
    let server = server_with_categories().await;
    seed_january_expenses(&server, 3);
    let mut h = harness(&server, 5, false);

    h.controller.load().await;
    let id = h.controller.rows()[0].id;
    let before = h.controller.refresh_signal().value();

    assert!(!h.controller.delete_transaction(id).await);
    assert_eq!(server.transaction_count(), 3);
    assert_eq!(h.controller.refresh_signal().value(), before);
}

#[tokio::test]
async fn starting_a_new_edit_cancels_the_previous_session() {
    let server = server_with_categories().await;
    let ids = seed_january_expenses(&server, 2);
    let mut h = harness(&server, 5, true);

    h.controller.load().await;
    h.controller.begin_category_edit(ids[0]).unwrap();
    h.controller.begin_category_edit(ids[1]).unwrap();

    assert_eq!(h.controller.edit_session().editing_id(), Some(ids[1]));
    // The implicit cancel never touches the network
    assert!(server.category_updates().is_empty());
}

#[tokio::test]
async fn edit_choice_list_is_partitioned_by_type() {
    let server = server_with_categories().await;
    seed_january_expenses(&server, 1);
    let mut h = harness(&server, 5, true);
    h.controller.load().await;

    let expense_names: Vec<&str> = h
        .controller
        .categories_for(TransactionType::Expense)
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(expense_names, vec!["Food", "Transport"]);

    let income_names: Vec<&str> = h
        .controller
        .categories_for(TransactionType::Income)
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(income_names, vec!["Salary"]);
}

#[tokio::test]
async fn committing_an_edit_issues_exactly_one_put_then_refetches() {
    let server = server_with_categories().await;
    let id = server.seed_transaction(
        date(2024, 1, 10),
        20.0,
        TransactionType::Expense,
        Some("Food"),
    );
    let mut h = harness(&server, 5, true);
    h.controller.load().await;

    h.controller.begin_category_edit(id).unwrap();
    assert_eq!(h.controller.edit_session().pending(), Some("Food"));
    h.controller.select_pending_category("Transport").unwrap();

    assert!(h.controller.commit_category_edit().await);
    assert_eq!(server.category_updates(), vec![(id, "Transport".to_string())]);
    // The refetched row reflects the update
    assert_eq!(h.controller.rows()[0].category_name(), "Transport");
    assert_eq!(h.controller.edit_session().editing_id(), None);
}

#[tokio::test]
async fn selecting_a_category_of_the_wrong_type_is_rejected_client_side() {
    let server = server_with_categories().await;
    let id = server.seed_transaction(
        date(2024, 1, 10),
        20.0,
        TransactionType::Expense,
        Some("Food"),
    );
    let mut h = harness(&server, 5, true);
    h.controller.load().await;

    h.controller.begin_category_edit(id).unwrap();
    assert!(h.controller.select_pending_category("Salary").is_err());
    // Pending value untouched by the rejected selection
    assert_eq!(h.controller.edit_session().pending(), Some("Food"));
    assert!(server.category_updates().is_empty());
}

#[tokio::test]
async fn committing_an_unknown_pending_category_preserves_the_session() {
    let server = server_with_categories().await;
    // Uncategorized row: pending defaults to "General", which is not
    // in the taxonomy
    let id = server.seed_transaction(date(2024, 1, 10), 20.0, TransactionType::Expense, None);
    let mut h = harness(&server, 5, true);
    h.controller.load().await;

    h.controller.begin_category_edit(id).unwrap();
    assert_eq!(h.controller.edit_session().pending(), Some("General"));

    let before = h.controller.refresh_signal().value();
    assert!(!h.controller.commit_category_edit().await);
    assert!(server.category_updates().is_empty());
    assert_eq!(h.controller.refresh_signal().value(), before);
    assert!(!h.notify.errors().is_empty());
    // The pending edit survives for retry
    assert_eq!(h.controller.edit_session().editing_id(), Some(id));
    assert_eq!(h.controller.edit_session().pending(), Some("General"));
}

#[tokio::test]
async fn failed_category_update_preserves_the_pending_edit() {
    let server = server_with_categories().await;
    let id = server.seed_transaction(
        date(2024, 1, 10),
        20.0,
        TransactionType::Expense,
        Some("Food"),
    );
    let mut h = harness(&server, 5, true);
    h.controller.load().await;

    h.controller.begin_category_edit(id).unwrap();
    h.controller.select_pending_category("Transport").unwrap();

    server.fail_next_request(500);
    let before = h.controller.refresh_signal().value();
    assert!(!h.controller.commit_category_edit().await);
    assert_eq!(h.controller.refresh_signal().value(), before);
    assert_eq!(h.controller.edit_session().pending(), Some("Transport"));
    assert!(h.notify.errors().iter().any(|e| e.contains("injected failure")));
}

#[tokio::test]
async fn every_successful_mutation_bumps_the_signal_exactly_once() {
    let server = server_with_categories().await;
    let id = seed_january_expenses(&server, 6)[0];
    let mut h = harness(&server, 5, true);
    h.controller.load().await;

    let v0 = h.controller.refresh_signal().value();

    assert!(
        h.controller
            .create_transaction(NewTransaction {
                amount: 99.0,
                description: Some("Paycheck".to_string()),
                date: date(2024, 1, 20),
                category: Some("Salary".to_string()),
                transaction_type: TransactionType::Income,
            })
            .await
    );
    assert_eq!(h.controller.refresh_signal().value(), v0 + 1);

    assert!(h.controller.delete_transaction(id).await);
    assert_eq!(h.controller.refresh_signal().value(), v0 + 2);

    // rows()[0] is the newly created income row; pick an expense row
    let other = h.controller.rows()[1].id;
    h.controller.begin_category_edit(other).unwrap();
    h.controller.select_pending_category("Transport").unwrap();
    assert!(h.controller.commit_category_edit().await);
    assert_eq!(h.controller.refresh_signal().value(), v0 + 3);
}

#[tokio::test]
async fn create_defers_to_the_server_when_the_taxonomy_is_unavailable() {
    let server = server_with_categories().await;
    let mut h = harness(&server, 5, true);

    // The category fetch fails during load; the list fetch still works
    server.fail_next_request(500);
    assert!(h.controller.load().await);
    assert!(h.controller.categories_for(TransactionType::Income).is_empty());

    // The server knows "Salary" even though the client never saw it
    assert!(
        h.controller
            .create_transaction(NewTransaction {
                amount: 99.0,
                description: None,
                date: date(2024, 1, 20),
                category: Some("Salary".to_string()),
                transaction_type: TransactionType::Income,
            })
            .await
    );
    assert_eq!(server.transaction_count(), 1);
}

#[tokio::test]
async fn failed_mutations_leave_the_signal_unchanged() {
    let server = server_with_categories().await;
    let id = seed_january_expenses(&server, 2)[0];
    let mut h = harness(&server, 5, true);
    h.controller.load().await;

    let v0 = h.controller.refresh_signal().value();

    server.fail_next_request(500);
    assert!(!h.controller.delete_transaction(id).await);
    assert_eq!(h.controller.refresh_signal().value(), v0);

    // Client-side validation failure: no request, no bump
    assert!(
        !h.controller
            .create_transaction(NewTransaction {
                amount: 5.0,
                description: None,
                date: date(2024, 1, 21),
                category: Some("Nonexistent".to_string()),
                transaction_type: TransactionType::Expense,
            })
            .await
    );
    assert_eq!(h.controller.refresh_signal().value(), v0);
    assert_eq!(h.notify.errors().len(), 2);
}

#[tokio::test]
async fn failed_fetch_keeps_rows_and_total_pages_intact() {
    let server = server_with_categories().await;
    seed_january_expenses(&server, 12);
    let mut h = harness(&server, 5, true);
    h.controller.load().await;

    server.fail_next_request(503);
    assert!(!h.controller.request_page(1).await);

    // Displayed state still matches page 0 and the known page count
    assert_eq!(h.controller.current_page(), 0);
    assert_eq!(h.controller.total_pages(), 3);
    assert_eq!(h.controller.rows().len(), 5);
    assert!(!h.notify.errors().is_empty());
}

#[tokio::test]
async fn nested_page_envelope_is_accepted() {
    let server = server_with_categories().await;
    seed_january_expenses(&server, 12);
    server.use_nested_page_envelope();
    let mut h = harness(&server, 5, true);

    assert!(h.controller.load().await);
    assert_eq!(h.controller.total_pages(), 3);
    assert_eq!(h.controller.rows().len(), 5);
}

#[tokio::test]
async fn dashboard_refetches_after_a_mutation_elsewhere() {
    let server = server_with_categories().await;
    let id = server.seed_transaction(
        date(2024, 1, 5),
        40.0,
        TransactionType::Expense,
        Some("Food"),
    );
    server.seed_transaction(date(2024, 1, 6), 100.0, TransactionType::Income, Some("Salary"));

    let signal = RefreshSignal::new();
    let notify = Arc::new(RecordingNotify::default());
    let mut list = ListController::new(
        ApiClient::new(&server.url()),
        january(),
        5,
        signal.clone(),
        notify,
        Arc::new(StaticConfirm(true)),
    );
    let mut dashboard = DashboardController::new(ApiClient::new(&server.url()), january(), &signal);

    list.load().await;
    let stats = dashboard.fetch().await.unwrap();
    assert_eq!(stats.total_expense, 40.0);
    assert_eq!(stats.balance, 60.0);

    // Nothing changed yet, so sync is a no-op
    assert!(!dashboard.sync().await.unwrap());

    assert!(list.delete_transaction(id).await);
    assert!(dashboard.sync().await.unwrap());
    assert_eq!(dashboard.stats().total_expense, 0.0);
    assert_eq!(dashboard.stats().balance, 100.0);
}

#[tokio::test]
async fn export_and_import_round_through_the_api() {
    let server = server_with_categories().await;
    seed_january_expenses(&server, 3);
    let client = ApiClient::new(&server.url());

    let bytes = client.export_csv(&january()).await.unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("Date,Category,Description,Type,Amount"));
    assert_eq!(text.lines().count(), 4);

    let signal = RefreshSignal::new();
    let mut listener = signal.listen();
    let summary = client
        .import_csv("statement.csv", text.into_bytes())
        .await
        .unwrap();
    assert!(summary.contains("3"));
    signal.bump();
    assert!(listener.take_change());
}

#[tokio::test]
async fn chart_endpoints_deserialize() {
    let server = server_with_categories().await;
    server.seed_transaction(date(2024, 1, 2), 15.0, TransactionType::Expense, Some("Food"));
    server.seed_transaction(
        date(2024, 2, 3),
        5.0,
        TransactionType::Expense,
        Some("Transport"),
    );
    server.seed_transaction(date(2024, 2, 4), 50.0, TransactionType::Income, Some("Salary"));

    let client = ApiClient::new(&server.url());

    let chart = client.chart_stats().await.unwrap();
    assert_eq!(chart.len(), 2);
    assert!(chart.iter().any(|c| c.category_name == "Food" && c.total_amount == 15.0));

    let monthly = client.monthly_stats().await.unwrap();
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0].month, "JAN");
    assert_eq!(monthly[1].income, 50.0);
    assert_eq!(monthly[1].expense, 5.0);
}
