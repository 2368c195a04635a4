//! Multi-session and multi-user fan-out behavior.

mod helpers;

use helpers::{TestApp, TEST_USER, TEST_USER_2};
use serde_json::json;

#[tokio::test]
async fn test_dual_session_same_identity() {
    let app = TestApp::new().await;
    app.engine.registry().create("foo").expect("create channel");

    let mut first = app.login(TEST_USER).await;
    let mut second = app.login(TEST_USER).await;

    // One session joins; every session of the identity sees the join.
    first.send_action("join", json!({"name": "foo"}));
    for client in [&mut first, &mut second] {
        let event = client.recv().await;
        assert_eq!(event.action, "user has joined the channel");
        assert_eq!(event.payload["nick"], TEST_USER);
    }

    // One session sends; both receive the message.
    second.send_action("send_message", json!({"channel": "foo", "text": "Baz"}));
    for client in [&mut first, &mut second] {
        let event = client.recv().await;
        assert_eq!(event.action, "new message in channel");
        assert_eq!(event.payload["text"], "Baz");
    }

    // One session leaves; both receive the self-only leave event.
    first.send_action("leave", json!({"name": "foo"}));
    for client in [&mut first, &mut second] {
        let event = client.recv().await;
        assert_eq!(event.action, "you have left the channel");
        assert_eq!(event.payload["channel"], "foo");
        assert_eq!(event.payload["nick"], TEST_USER);
    }
}

#[tokio::test]
async fn test_post_leave_send_rejected() {
    let app = TestApp::new().await;
    app.engine.registry().create("foo").expect("create channel");

    let mut first = app.login(TEST_USER).await;
    let mut second = app.login(TEST_USER).await;

    first.send_action("join", json!({"name": "foo"}));
    first.recv().await;
    second.recv().await;

    first.send_action("leave", json!({"name": "foo"}));
    first.recv().await;
    second.recv().await;

    // Either session's send is now rejected and nobody gets a message.
    second.send_action("send_message", json!({"channel": "foo", "text": "Baz"}));
    let error = second.recv().await;
    assert_eq!(error.action, "invalid request");
    assert_eq!(
        error.payload["description"],
        "user is not member of this channel"
    );
    assert!(first.is_idle());
    assert_eq!(app.index.len(), 0);
}

#[tokio::test]
async fn test_two_users_share_a_channel() {
    let app = TestApp::new().await;

    let mut alice = app.login(TEST_USER).await;
    let mut bob = app.login(TEST_USER_2).await;

    alice.send_action("create", json!({"name": "foo"}));
    let event = alice.recv().await;
    assert_eq!(event.action, "user has joined the channel");

    bob.send_action("join", json!({"name": "foo"}));
    let alice_view = alice.recv().await;
    let bob_view = bob.recv().await;
    assert_eq!(alice_view.payload["nick"], TEST_USER_2);
    assert_eq!(bob_view.payload["nick"], TEST_USER_2);

    bob.send_action("send_message", json!({"channel": "foo", "text": "hello"}));
    for client in [&mut alice, &mut bob] {
        let message = client.recv().await;
        assert_eq!(message.action, "new message in channel");
        assert_eq!(message.payload["author"], TEST_USER_2);
    }
}

#[tokio::test]
async fn test_disconnect_fans_out_leave() {
    let app = TestApp::new().await;
    app.engine.registry().create("foo").expect("create channel");

    let mut alice = app.login(TEST_USER).await;
    let mut bob = app.login(TEST_USER_2).await;

    alice.send_action("join", json!({"name": "foo"}));
    alice.recv().await;
    bob.send_action("join", json!({"name": "foo"}));
    alice.recv().await;
    bob.recv().await;

    // All of alice's sessions close: the actor dissolves and every channel
    // drops her membership.
    alice.close();

    let event = bob.recv().await;
    assert_eq!(event.action, "user has left the channel");
    assert_eq!(event.payload["channel"], "foo");
    assert_eq!(event.payload["nick"], TEST_USER);
    assert!(!app.engine.registry().is_member(TEST_USER, "foo"));
}

#[tokio::test]
async fn test_channel_events_observed_in_one_order() {
    let app = TestApp::new().await;
    app.engine.registry().create("foo").expect("create channel");

    let mut alice = app.login(TEST_USER).await;
    let mut bob = app.login(TEST_USER_2).await;

    alice.send_action("join", json!({"name": "foo"}));
    alice.recv().await;
    bob.send_action("join", json!({"name": "foo"}));
    alice.recv().await;
    bob.recv().await;

    for text in ["one", "two", "three"] {
        alice.send_action("send_message", json!({"channel": "foo", "text": text}));
        // Await the author's own copy so the sends are applied in order.
        alice.recv().await;
    }

    // Every member observes the messages in the order the registry
    // applied them.
    for expected in ["one", "two", "three"] {
        let event = bob.recv().await;
        assert_eq!(event.action, "new message in channel");
        assert_eq!(event.payload["text"], expected);
    }
}
