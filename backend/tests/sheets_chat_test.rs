//! End-to-end run against fake Google Sheets and Google Chat APIs.

use std::sync::Arc;

use bridgette_backend::config::{ColumnLayout, CommandsConfig, RegistryBackend};
use bridgette_backend::models::user::UserRef;
use bridgette_backend::test_util::{event_from_json, test_config, FixedCompleteness};
use bridgette_backend::{AppState, Bot, ChatNotifier, SheetsRowStore, UserRegistry};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn state_for(server: &MockServer) -> AppState {
    let mut config = test_config();
    config.registry.backend = RegistryBackend::Sheets;
    config.registry.spreadsheet_id = "db".to_string();
    config.google.sheets_base_url = server.uri();
    config.google.chat_base_url = server.uri();
    AppState::from_config(config).unwrap()
}

/// Bot over the fake APIs with a fixed completeness answer.
fn bot_for(server: &MockServer, complete: bool) -> Bot {
    let store = Arc::new(SheetsRowStore::new(&server.uri(), "db", "Users", "test-token"));
    let registry = Arc::new(UserRegistry::new(store, ColumnLayout::default()));
    Bot::new(
        registry,
        Arc::new(ChatNotifier::new(&server.uri(), "test-token")),
        Arc::new(FixedCompleteness(complete)),
        CommandsConfig::default(),
    )
}

fn users_sheet() -> serde_json::Value {
    json!({
        "range": "Users!A1:G4",
        "majorDimension": "ROWS",
        "values": [
            ["User ID", "Display Name", "Email", "Spreadsheet ID", "Is Enabled", "Is Admin", "Last Notified"],
            ["users/100", "Boss", "boss@example.com", "", false, "TRUE"],
            ["users/200", "NoSheet", "n@example.com", "", true, false],
            ["users/300", "Late", "l@example.com", "sheetL", true, false]
        ]
    })
}

#[tokio::test]
async fn test_bulk_check_with_incomplete_timesheet_sends_one_reminder() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/db/values/Users"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_sheet()))
        .mount(&server)
        .await;

    // Only users/300 has a spreadsheet; users/200 is skipped.
    Mock::given(method("POST"))
        .and(path("/v1/spaces/300/messages"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({"text": "Hi Late, your timesheet for 202501 is incomplete. Please check it."})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/spaces/200/messages"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let bot = bot_for(&server, false);
    let event = event_from_json(json!({
        "type": "MESSAGE",
        "message": {"slashCommand": {"commandId": "3"}, "argumentText": "202501"},
        "user": {"name": "users/100", "displayName": "Boss"}
    }));

    let reply = bot.handle_event(&event).await.unwrap();
    let text = reply.text.unwrap();
    assert!(text.contains("Checked 1 users."), "{}", text);
    assert!(text.contains("Sent reminders to 1 users"), "{}", text);
}

#[tokio::test]
async fn test_first_user_on_blank_sheet_gets_header_and_row_two() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/db/values/Users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"range": "Users!A1:Z1000", "majorDimension": "ROWS"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/db/values/Users:append"))
        .and(body_json(json!({
            "values": [["User ID", "Display Name", "Email", "Spreadsheet ID", "Is Enabled", "Is Admin", "Last Notified"]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/db/values/Users:append"))
        .and(body_json(json!({
            "values": [["users/400", "New", "new@example.com", "", false, false, ""]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let bot = bot_for(&server, true);
    let record = bot
        .registry()
        .get_or_create(&UserRef::new("users/400", "New", "new@example.com"))
        .await
        .unwrap();
    assert_eq!(record.row.0, 2);
}

#[tokio::test]
async fn test_register_writes_spreadsheet_cell() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/db/values/Users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_sheet()))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/db/values/Users!D3"))
        .and(body_json(json!({"values": [["sheetN"]]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let state = state_for(&server).await;
    let event = event_from_json(json!({
        "type": "MESSAGE",
        "message": {"slashCommand": {"commandId": "2"}, "argumentText": "sheetN"},
        "user": {"name": "users/200"}
    }));

    let reply = state.bot.handle_event(&event).await.unwrap();
    assert_eq!(reply.text.as_deref(), Some("Timesheet registered successfully."));
}

#[tokio::test]
async fn test_new_user_is_appended_on_join() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/db/values/Users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_sheet()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/db/values/Users:append"))
        .and(body_json(json!({
            "values": [["users/400", "New", "new@example.com", "", false, false, ""]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let state = state_for(&server).await;
    let event = event_from_json(json!({
        "type": "ADDED_TO_SPACE",
        "user": {"name": "users/400", "displayName": "New", "email": "new@example.com"}
    }));

    let reply = state.bot.handle_event(&event).await.unwrap();
    assert!(reply.cards_v2.is_some());
}

#[tokio::test]
async fn test_missing_sheet_degrades_to_permission_denied() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let state = state_for(&server).await;
    let event = event_from_json(json!({
        "type": "MESSAGE",
        "message": {"slashCommand": {"commandId": "3"}, "argumentText": "202501"},
        "user": {"name": "users/100"}
    }));

    let reply = state.bot.handle_event(&event).await.unwrap();
    assert_eq!(
        reply.text.as_deref(),
        Some("You do not have permission to use this command.")
    );
}
