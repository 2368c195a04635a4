//! HTTP endpoints and the websocket surface, driven through the real
//! router and application state.

mod helpers;

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use helpers::{WebApp, TEST_PASSWORD};

#[tokio::test]
async fn test_register_and_duplicate_nick() {
    let app = WebApp::new();
    assert_eq!(app.register("alice").await, StatusCode::CREATED);

    let response = app
        .request(
            "POST",
            "/api/profiles",
            None,
            Some(json!({ "nick": "alice", "password": "other" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], "this nick is already used");
}

#[tokio::test]
async fn test_register_requires_nick_and_password() {
    let app = WebApp::new();

    let response = app
        .request(
            "POST",
            "/api/profiles",
            None,
            Some(json!({ "password": "foo420" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["message"], "nick is required");

    let response = app
        .request("POST", "/api/profiles", None, Some(json!({ "nick": "alice" })))
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["message"], "password is required");
}

#[tokio::test]
async fn test_edit_profile_with_basic_auth() {
    let app = WebApp::new();
    app.register("alice").await;

    let response = app
        .request(
            "PUT",
            "/api/profiles/me",
            Some(("alice", TEST_PASSWORD)),
            Some(json!({ "description": "hello there" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let profile = app.request("GET", "/api/profiles/alice", None, None).await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["nick"], "alice");
    assert_eq!(profile.body["description"], "hello there");
}

#[tokio::test]
async fn test_edit_profile_rejects_bad_credentials() {
    let app = WebApp::new();
    app.register("alice").await;

    let response = app
        .request(
            "PUT",
            "/api/profiles/me",
            Some(("alice", "wrong")),
            Some(json!({ "description": "nope" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("PUT", "/api/profiles/me", None, Some(json!({ "description": "nope" })))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_profile_not_found() {
    let app = WebApp::new();
    let response = app.request("GET", "/api/profiles/nobody", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "user not found");
}

#[tokio::test]
async fn test_history_of_unknown_channel_not_found() {
    let app = WebApp::new();
    app.register("alice").await;

    let response = app
        .request(
            "GET",
            "/api/channels/nowhere/history",
            Some(("alice", TEST_PASSWORD)),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "channel not found");

    let response = app
        .request("GET", "/api/channels/nowhere/history", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let app = WebApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_ws_round_trip() {
    let app = WebApp::new();
    app.register("alice").await;
    let addr = app.serve().await;

    let mut client = WsClient::connect(addr).await;
    client.login("alice").await;

    client.send_json(json!({ "action": "create", "payload": { "name": "foo" } })).await;
    let joined = client.recv_frame().await;
    assert_eq!(joined["action"], "user has joined the channel");
    assert_eq!(joined["payload"]["channel"], "foo");
    assert_eq!(joined["payload"]["nick"], "alice");

    client.send_json(json!({
        "action": "send_message",
        "payload": { "channel": "foo", "text": "hi!" }
    }))
    .await;
    let message = client.recv_frame().await;
    assert_eq!(message["action"], "new message in channel");
    assert_eq!(message["payload"]["author"], "alice");
    assert_eq!(message["payload"]["text"], "hi!");

    // The message went through the real state's index before delivery.
    assert_eq!(app.state.engine.registry().channel_count(), 1);
}

#[tokio::test]
async fn test_ws_malformed_frame_answered_not_fatal() {
    let app = WebApp::new();
    app.register("alice").await;
    let addr = app.serve().await;

    let mut client = WsClient::connect(addr).await;
    client.login("alice").await;

    // Not JSON at all: answered with `invalid request`, session stays up.
    client.send_text("{this is not json").await;
    let error = client.recv_frame().await;
    assert_eq!(error["action"], "invalid request");

    client.send_json(json!({ "action": "create", "payload": { "name": "foo" } })).await;
    let joined = client.recv_frame().await;
    assert_eq!(joined["action"], "user has joined the channel");
}

#[tokio::test]
async fn test_ws_close_dissolves_membership() {
    let app = WebApp::new();
    app.register("alice").await;
    app.register("bob").await;
    let addr = app.serve().await;

    let mut alice = WsClient::connect(addr).await;
    alice.login("alice").await;
    alice.send_json(json!({ "action": "create", "payload": { "name": "foo" } })).await;
    alice.recv_frame().await;

    let mut bob = WsClient::connect(addr).await;
    bob.login("bob").await;
    bob.send_json(json!({ "action": "join", "payload": { "name": "foo" } })).await;
    assert_eq!(bob.recv_frame().await["action"], "user has joined the channel");
    assert_eq!(
        alice.recv_frame().await["payload"]["nick"],
        "bob"
    );

    // Alice's only connection closes: her actor dissolves and the channel
    // drops her membership.
    alice.close().await;

    let event = bob.recv_frame().await;
    assert_eq!(event["action"], "user has left the channel");
    assert_eq!(event["payload"]["channel"], "foo");
    assert_eq!(event["payload"]["nick"], "alice");
}

/// Minimal websocket client over the served app.
struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    async fn connect(addr: SocketAddr) -> Self {
        let (stream, _response) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
            .await
            .expect("websocket connect");
        Self { stream }
    }

    async fn send_json(&mut self, value: Value) {
        self.send_text(&value.to_string()).await;
    }

    async fn send_text(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string()))
            .await
            .expect("websocket send");
    }

    async fn recv_frame(&mut self) -> Value {
        loop {
            let message = tokio::time::timeout(Duration::from_secs(5), self.stream.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("connection closed")
                .expect("websocket error");
            if let Message::Text(text) = message {
                return serde_json::from_str(&text).expect("frame is json");
            }
        }
    }

    async fn login(&mut self, nick: &str) {
        self.send_json(json!({
            "action": "login",
            "payload": { "nick": nick, "password": TEST_PASSWORD }
        }))
        .await;
        let frame = self.recv_frame().await;
        assert_eq!(frame["action"], format!("logged_in:{nick}"));
    }

    async fn close(mut self) {
        self.stream.close(None).await.expect("websocket close");
    }
}
