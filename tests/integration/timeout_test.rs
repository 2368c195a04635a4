//! Two-phase inactivity timeout behavior, driven under paused time.

mod helpers;

use std::time::Duration;

use helpers::{TestApp, TEST_USER};
use serde_json::json;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_unauthorized_timeout() {
    let app = TestApp::new().await;
    let mut client = app.connect();
    let opened = Instant::now();

    // No login, no frames: the unauthorized grace expires.
    let frame = client.recv_untimed().await;
    assert_eq!(frame.action, "connection_timed_out");

    let elapsed = opened.elapsed();
    assert!(
        elapsed >= Duration::from_secs(60) && elapsed < Duration::from_secs(61),
        "timed out after {elapsed:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn test_authorized_idle_extension() {
    let app = TestApp::new().await;
    let mut client = app.login(TEST_USER).await;
    let logged_in = Instant::now();

    // Idle past the unauthorized grace: no timeout until the (longer)
    // authorized deadline elapses.
    let frame = client.recv_untimed().await;
    assert_eq!(frame.action, "connection_timed_out");

    let elapsed = logged_in.elapsed();
    assert!(
        elapsed >= Duration::from_secs(600),
        "timed out too early, after {elapsed:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn test_failed_login_keeps_unauthorized_grace() {
    let app = TestApp::new().await;
    let mut client = app.connect();

    client.send_action("login", json!({"nick": TEST_USER, "password": "wrong"}));
    let error = client.recv_untimed().await;
    assert_eq!(error.action, "invalid request");
    let refreshed = Instant::now();

    // A failed attempt refreshes the unauthorized grace, not the
    // authorized idle timeout.
    let frame = client.recv_untimed().await;
    assert_eq!(frame.action, "connection_timed_out");
    let elapsed = refreshed.elapsed();
    assert!(
        elapsed < Duration::from_secs(61),
        "unauthorized session survived {elapsed:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn test_activity_refreshes_deadline() {
    let app = TestApp::new().await;
    app.engine.registry().create("foo").expect("create channel");
    let mut client = app.login(TEST_USER).await;
    let logged_in = Instant::now();

    // Stay just inside the deadline a few times.
    for _ in 0..3 {
        tokio::time::sleep(Duration::from_secs(599)).await;
        client.send_action("join", json!({"name": "foo"}));
        let joined = client.recv_untimed().await;
        assert_eq!(joined.action, "user has joined the channel");
        client.send_action("leave", json!({"name": "foo"}));
        let left = client.recv_untimed().await;
        assert_eq!(left.action, "you have left the channel");
    }

    // Only after going fully idle does the connection time out.
    let frame = client.recv_untimed().await;
    assert_eq!(frame.action, "connection_timed_out");
    assert!(logged_in.elapsed() >= Duration::from_secs(3 * 599 + 600));
}
