#![expect(clippy::unwrap_used, reason = "test code")]

use std::time::Duration;

use autodelete_core::{DeleteAction, DeleteOutcome, DeletionKey};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::{TelegramClient, truncate};
use crate::error::TelegramError;

const TOKEN: &str = "123:test-token";

fn client_for(server: &MockServer) -> TelegramClient {
    TelegramClient::new(TOKEN.to_owned(), &server.uri(), Duration::from_secs(5)).unwrap()
}

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": result }))
}

fn api_error(code: u16, description: &str) -> ResponseTemplate {
    ResponseTemplate::new(code).set_body_json(json!({
        "ok": false,
        "error_code": code,
        "description": description,
    }))
}

#[tokio::test]
async fn test_get_me() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/getMe")))
        .respond_with(ok(json!({ "id": 77, "is_bot": true, "first_name": "Cleaner", "username": "cleaner_bot" })))
        .mount(&server)
        .await;

    let me = client_for(&server).get_me().await.unwrap();
    assert_eq!(me.id, 77);
    assert!(me.is_bot);
    assert_eq!(me.username.as_deref(), Some("cleaner_bot"));
}

#[tokio::test]
async fn test_get_me_rejected_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/getMe")))
        .respond_with(api_error(401, "Unauthorized"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_me().await.unwrap_err();
    assert!(matches!(err, TelegramError::Api { code: 401, .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_get_updates_sends_offset_and_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .and(body_json(json!({
            "offset": 41,
            "timeout": 0,
            "allowed_updates": ["message", "channel_post"],
        })))
        .respond_with(ok(json!([
            { "update_id": 41, "message": {
                "message_id": 5, "date": 1, "chat": { "id": -9, "type": "group" }, "text": "hi"
            }},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let updates = client_for(&server).get_updates(Some(41), 0).await.unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].update_id, 41);
}

#[tokio::test]
async fn test_delete_action_deleted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/deleteMessage")))
        .and(body_partial_json(json!({ "chat_id": -100, "message_id": 7 })))
        .respond_with(ok(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome = DeleteAction::delete_message(&client, DeletionKey::new(-100, 7)).await;
    assert_eq!(outcome, DeleteOutcome::Deleted);
}

#[tokio::test]
async fn test_delete_action_bad_request_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/deleteMessage")))
        .respond_with(api_error(400, "Bad Request: message to delete not found"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome = DeleteAction::delete_message(&client, DeletionKey::new(-100, 8)).await;
    assert_eq!(outcome, DeleteOutcome::NotFound);
}

#[tokio::test]
async fn test_delete_action_server_error_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/deleteMessage")))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome = DeleteAction::delete_message(&client, DeletionKey::new(-100, 9)).await;
    let DeleteOutcome::Failed(reason) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(reason.contains("502"), "reason: {reason}");
}

#[tokio::test]
async fn test_delete_action_timeout_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/deleteMessage")))
        .respond_with(ok(json!(true)).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client =
        TelegramClient::new(TOKEN.to_owned(), &server.uri(), Duration::from_millis(200)).unwrap();
    let outcome = DeleteAction::delete_message(&client, DeletionKey::new(-100, 10)).await;
    let DeleteOutcome::Failed(reason) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(!reason.contains(TOKEN), "token leaked into error: {reason}");
}

#[tokio::test]
async fn test_malformed_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/getMe")))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_me().await.unwrap_err();
    assert!(matches!(err, TelegramError::JsonParse { .. }));
}

#[test]
fn test_debug_redacts_token() {
    let client =
        TelegramClient::new(TOKEN.to_owned(), "https://api.telegram.org/", Duration::from_secs(1))
            .unwrap();
    let debug = format!("{client:?}");
    assert!(!debug.contains("test-token"));
    assert_eq!(client.base_url(), "https://api.telegram.org");
}

#[test]
fn test_truncate_unicode_boundary() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello world", 5), "hello");
    assert!(truncate("привет", 3).len() <= 3);
}
