use std::sync::Arc;

use axum::body::Body;
use bridgette_backend::config::RegistryBackend;
use bridgette_backend::registry::Cell;
use bridgette_backend::test_util::{test_bot, test_config, MemoryRowStore, RecordingNotifier};
use bridgette_backend::{app, AppState, StartupError};
use bytes::Bytes;
use http::StatusCode;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn test_app(store: Arc<MemoryRowStore>, notifier: Arc<RecordingNotifier>) -> axum::Router {
    let bot = test_bot(store, notifier, false);
    app(Arc::new(AppState::new(test_config(), bot)))
}

async fn send_request(app: &axum::Router, method: http::Method, uri: &str, body: Option<Value>) -> (StatusCode, Bytes) {
    let mut req_builder = http::Request::builder()
        .method(method)
        .uri(uri);

    if body.is_some() {
        req_builder = req_builder.header("Content-Type", "application/json");
    }

    let req = req_builder.body(match body {
        Some(b) => Body::from(b.to_string()),
        None => Body::empty(),
    }).unwrap();

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes)
}

async fn post_event(app: &axum::Router, event: Value) -> Value {
    let (status, body) = send_request(app, http::Method::POST, "/chat/events", Some(event)).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app(Arc::new(MemoryRowStore::with_header()), Arc::new(RecordingNotifier::default()));

    let (status, body) = send_request(&app, http::Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_removed_from_space_returns_empty_body() {
    let app = test_app(Arc::new(MemoryRowStore::with_header()), Arc::new(RecordingNotifier::default()));

    let (status, body) = send_request(
        &app,
        http::Method::POST,
        "/chat/events",
        Some(json!({"type": "REMOVED_FROM_SPACE", "space": {"name": "spaces/AAA"}})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_plain_message_gets_under_development_text() {
    let app = test_app(Arc::new(MemoryRowStore::with_header()), Arc::new(RecordingNotifier::default()));

    let reply = post_event(&app, json!({
        "type": "MESSAGE",
        "message": {"text": "hi there"},
        "user": {"name": "users/1"}
    }))
    .await;

    assert_eq!(reply, json!({"text": "I am under development but some commands are up!"}));
}

#[tokio::test]
async fn test_handler_error_becomes_generic_text() {
    let store = Arc::new(MemoryRowStore::with_header());
    store.set_unavailable(true);
    let app = test_app(store, Arc::new(RecordingNotifier::default()));

    let reply = post_event(&app, json!({
        "type": "MESSAGE",
        "message": {"slashCommand": {"commandId": "1"}, "argumentText": ""},
        "user": {"name": "users/1"}
    }))
    .await;

    assert_eq!(reply, json!({"text": "An error occurred. Please try again later."}));
}

/// Join, consent, register, check: the full onboarding flow for one user.
#[tokio::test]
async fn test_onboarding_scenario() {
    let store = Arc::new(MemoryRowStore::with_header());
    let app = test_app(store.clone(), Arc::new(RecordingNotifier::default()));
    let user = json!({"name": "users/u1", "displayName": "Ursula", "email": "u1@example.com"});

    let reply = post_event(&app, json!({"type": "ADDED_TO_SPACE", "user": user})).await;
    assert_eq!(reply["cardsV2"][0]["cardId"], "consentCard");
    let rows = store.snapshot();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], Cell::from("users/u1"));
    assert_eq!(rows[1][3], Cell::empty());
    assert_eq!(rows[1][4], Cell::Bool(false));

    let reply = post_event(&app, json!({
        "type": "CARD_CLICKED",
        "common": {"invokedFunction": "give_consent"},
        "user": user
    }))
    .await;
    assert_eq!(reply["actionResponse"]["type"], "UPDATE_MESSAGE");
    assert_eq!(store.snapshot()[1][4], Cell::Bool(true));

    let reply = post_event(&app, json!({
        "type": "MESSAGE",
        "message": {"slashCommand": {"commandId": "2"}, "argumentText": " sheetA"},
        "user": user
    }))
    .await;
    assert_eq!(reply["text"], "Timesheet registered successfully.");
    assert_eq!(store.snapshot()[1][3], Cell::from("sheetA"));

    let reply = post_event(&app, json!({
        "type": "MESSAGE",
        "message": {"slashCommand": {"commandId": "1"}},
        "user": user
    }))
    .await;
    let text = reply["text"].as_str().unwrap();
    assert!(text.contains("Ursula"));
    assert!(text.contains("the current month"));

    // Still exactly one record for u1.
    assert_eq!(store.snapshot().len(), 2);
}

#[tokio::test]
async fn test_bulk_check_scenario() {
    let store = Arc::new(MemoryRowStore::with_header());
    store.push_row(vec![
        Cell::from("users/admin"), Cell::from("Boss"), Cell::empty(), Cell::empty(),
        Cell::Bool(false), Cell::from("TRUE"),
    ]);
    store.push_row(vec![
        Cell::from("users/a"), Cell::from("NoSheet"), Cell::empty(), Cell::empty(),
        Cell::Bool(true), Cell::Bool(false),
    ]);
    store.push_row(vec![
        Cell::from("users/b"), Cell::from("Late"), Cell::empty(), Cell::from("sheetB"),
        Cell::Bool(true), Cell::Bool(false),
    ]);
    let notifier = Arc::new(RecordingNotifier::default());
    let app = test_app(store.clone(), notifier.clone());

    let reply = post_event(&app, json!({
        "type": "MESSAGE",
        "message": {"slashCommand": {"commandId": "3"}, "argumentText": "202501"},
        "user": {"name": "users/admin", "displayName": "Boss"}
    }))
    .await;

    let text = reply["text"].as_str().unwrap();
    assert!(text.contains("Checked 1 users."));
    assert!(text.contains("Sent reminders to 1 users"));

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "users/b");
    assert_eq!(store.writes(), 0);
    assert_eq!(store.appends(), 0);
}

#[tokio::test]
async fn test_bulk_check_denied_for_non_admin() {
    let store = Arc::new(MemoryRowStore::with_header());
    store.push_row(vec![
        Cell::from("users/b"), Cell::from("Late"), Cell::empty(), Cell::from("sheetB"),
        Cell::Bool(true), Cell::Bool(false),
    ]);
    let notifier = Arc::new(RecordingNotifier::default());
    let app = test_app(store.clone(), notifier.clone());

    let reply = post_event(&app, json!({
        "type": "MESSAGE",
        "message": {"slashCommand": {"commandId": "3"}, "argumentText": "202501"},
        "user": {"name": "users/b"}
    }))
    .await;

    assert_eq!(reply["text"], "You do not have permission to use this command.");
    assert!(notifier.sent().is_empty());
    assert_eq!(store.writes(), 0);
    assert_eq!(store.appends(), 0);
    // One read to ensure the caller exists, one for the admin lookup; no listing.
    assert_eq!(store.reads(), 2);
}

#[tokio::test]
async fn test_sqlite_backend_from_config() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config();
    config.registry.backend = RegistryBackend::Sqlite;
    config.registry.sqlite_path = dir.path().join("registry.db").to_str().unwrap().to_string();

    let state = Arc::new(AppState::from_config(config).unwrap());
    let app = app(state.clone());

    let reply = post_event(&app, json!({
        "type": "ADDED_TO_SPACE",
        "user": {"name": "users/9", "displayName": "Nine"}
    }))
    .await;
    assert!(reply["cardsV2"].is_array());

    let record = state
        .bot
        .registry()
        .find_by_user_id("users/9")
        .await
        .unwrap();
    assert!(record.is_some());
}

#[test]
fn test_sheets_backend_requires_spreadsheet_id() {
    let mut config = test_config();
    config.registry.backend = RegistryBackend::Sheets;
    config.registry.spreadsheet_id = "  ".to_string();

    assert!(matches!(
        AppState::from_config(config),
        Err(StartupError::MissingSpreadsheetId)
    ));
}
