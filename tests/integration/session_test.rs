//! Single-session lifecycle and request validation over one connection.

mod helpers;

use helpers::{TestApp, TEST_USER};
use serde_json::json;

#[tokio::test]
async fn test_single_session_lifecycle() {
    let app = TestApp::new().await;
    let mut client = app.login(TEST_USER).await;

    client.send_action("create", json!({"name": "foo"}));
    let joined = client.recv().await;
    assert_eq!(joined.action, "user has joined the channel");
    assert_eq!(joined.payload["channel"], "foo");
    assert_eq!(joined.payload["nick"], TEST_USER);

    client.send_action("send_message", json!({"channel": "foo", "text": "hi!"}));
    let message = client.recv().await;
    assert_eq!(message.action, "new message in channel");
    assert_eq!(message.payload["author"], TEST_USER);
    assert_eq!(message.payload["text"], "hi!");
    assert_eq!(message.payload["channel"], "foo");
}

#[tokio::test]
async fn test_message_persisted_before_delivery() {
    let app = TestApp::new().await;
    let mut client = app.login(TEST_USER).await;

    client.send_action("create", json!({"name": "foo"}));
    client.recv().await;
    client.send_action("send_message", json!({"channel": "foo", "text": "hi!"}));
    client.recv().await;

    // By the time the event was delivered the sink already held the message.
    assert_eq!(app.index.len(), 1);
}

#[tokio::test]
async fn test_send_before_login_rejected() {
    let app = TestApp::new().await;
    let mut client = app.connect();

    client.send_action("send_message", json!({"channel": "foo", "text": "hi!"}));
    let error = client.recv().await;
    assert_eq!(error.action, "invalid request");
    let description = error.payload["description"].as_str().expect("description");
    assert!(description.contains("log in first"), "got: {description}");
}

#[tokio::test]
async fn test_login_with_bad_credentials_rejected() {
    let app = TestApp::new().await;
    let mut client = app.connect();

    client.send_action("login", json!({"nick": TEST_USER, "password": "wrong"}));
    let error = client.recv().await;
    assert_eq!(error.action, "invalid request");
    assert_eq!(
        error.payload["description"],
        "login rejected: invalid credentials"
    );

    // The connection survives a failed login attempt.
    client.send_action("login", json!({"nick": TEST_USER, "password": "foo420"}));
    let frame = client.recv().await;
    assert_eq!(frame.action, format!("logged_in:{TEST_USER}"));
}

#[tokio::test]
async fn test_duplicate_create_rejected() {
    let app = TestApp::new().await;
    let mut client = app.login(TEST_USER).await;

    client.send_action("create", json!({"name": "foo"}));
    client.recv().await;

    client.send_action("create", json!({"name": "foo"}));
    let error = client.recv().await;
    assert_eq!(error.action, "invalid request");
    assert_eq!(
        error.payload["description"],
        "channel with this name already exists"
    );
}

#[tokio::test]
async fn test_empty_channel_name_rejected() {
    let app = TestApp::new().await;
    let mut client = app.login(TEST_USER).await;

    for action in ["create", "join", "leave"] {
        client.send_action(action, json!({"name": ""}));
        let error = client.recv().await;
        assert_eq!(error.action, "invalid request");
        assert_eq!(error.payload["description"], "channel's `name` is required");
    }
}

#[tokio::test]
async fn test_unknown_action_rejected_without_teardown() {
    let app = TestApp::new().await;
    let mut client = app.login(TEST_USER).await;

    client.send_action("dance", json!({}));
    let error = client.recv().await;
    assert_eq!(error.action, "invalid request");

    // Parse errors never terminate the session.
    client.send_action("create", json!({"name": "foo"}));
    assert_eq!(client.recv().await.action, "user has joined the channel");
}

#[tokio::test]
async fn test_join_of_unknown_channel_rejected() {
    let app = TestApp::new().await;
    let mut client = app.login(TEST_USER).await;

    client.send_action("join", json!({"name": "nowhere"}));
    let error = client.recv().await;
    assert_eq!(error.action, "invalid request");
    assert_eq!(error.payload["description"], "channel not found");
}
