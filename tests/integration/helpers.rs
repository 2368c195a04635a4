//! Shared helpers for the integration tests: an in-process engine over
//! in-memory transports.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::Engine;
use tokio::sync::mpsc;
use tower::ServiceExt;

use chathub_api::router::build_router;
use chathub_api::state::AppState;
use chathub_auth::profile::memory::MemoryProfileRepository;
use chathub_auth::profile::service::ProfileService;
use chathub_core::config::{AppConfig, AuthConfig, IndexConfig, SessionConfig};
use chathub_core::error::AppError;
use chathub_core::result::AppResult;
use chathub_core::types::CreateProfileRequest;
use chathub_index::store::MessageStore;
use chathub_realtime::engine::ChatEngine;
use chathub_realtime::protocol::frames::SocketFrame;
use chathub_realtime::session::transport::SessionTransport;

/// Nick registered in every test app.
pub const TEST_USER: &str = "SpecialTestUser";
/// Second registered nick.
pub const TEST_USER_2: &str = "SecondTestUser";
/// Password shared by the registered test users.
pub const TEST_PASSWORD: &str = "foo420";

/// A fully assembled in-process chat engine.
pub struct TestApp {
    pub engine: ChatEngine,
    pub index: Arc<MessageStore>,
}

impl TestApp {
    /// Engine with default timeouts and the two test users registered.
    pub async fn new() -> Self {
        Self::with_session_config(SessionConfig::default()).await
    }

    /// Engine with explicit session timeouts.
    pub async fn with_session_config(session: SessionConfig) -> Self {
        let profiles = Arc::new(ProfileService::new(
            Arc::new(MemoryProfileRepository::new()),
            &AuthConfig::default(),
        ));
        for nick in [TEST_USER, TEST_USER_2] {
            profiles
                .create(&CreateProfileRequest {
                    nick: nick.to_string(),
                    password: TEST_PASSWORD.to_string(),
                    description: String::new(),
                })
                .await
                .expect("register test user");
        }

        let index = Arc::new(MessageStore::new(&IndexConfig::default()));
        let engine = ChatEngine::new(session, index.clone(), profiles);
        Self { engine, index }
    }

    /// Open a connection served by the engine.
    pub fn connect(&self) -> TestClient {
        let (transport, client) = test_transport();
        let engine = self.engine.clone();
        tokio::spawn(async move { engine.serve_session(transport).await });
        client
    }

    /// Open a connection and log it in.
    pub async fn login(&self, nick: &str) -> TestClient {
        let mut client = self.connect();
        client.send_action(
            "login",
            serde_json::json!({ "nick": nick, "password": TEST_PASSWORD }),
        );
        let frame = client.recv().await;
        assert_eq!(frame.action, format!("logged_in:{nick}"));
        client
    }
}

/// Client side of an in-memory connection.
pub struct TestClient {
    to_server: Option<mpsc::UnboundedSender<SocketFrame>>,
    from_server: mpsc::UnboundedReceiver<SocketFrame>,
}

impl TestClient {
    /// Send one frame to the server.
    pub fn send(&self, frame: SocketFrame) {
        self.to_server
            .as_ref()
            .expect("connection already closed")
            .send(frame)
            .expect("server dropped the connection");
    }

    /// Send an action with a JSON payload.
    pub fn send_action(&self, action: &str, payload: serde_json::Value) {
        self.send(SocketFrame {
            action: action.to_string(),
            payload,
        });
    }

    /// Await the next frame, bounded so broken tests fail fast.
    pub async fn recv(&mut self) -> SocketFrame {
        tokio::time::timeout(Duration::from_secs(5), self.from_server.recv())
            .await
            .expect("timed out waiting for a frame")
            .expect("server closed the connection")
    }

    /// Await the next frame without a helper timer. Used by the paused-time
    /// tests where the supervisor deadline must be the only pending timer.
    pub async fn recv_untimed(&mut self) -> SocketFrame {
        self.from_server
            .recv()
            .await
            .expect("server closed the connection")
    }

    /// Whether no frame is currently queued for this client.
    pub fn is_idle(&mut self) -> bool {
        matches!(
            self.from_server.try_recv(),
            Err(mpsc::error::TryRecvError::Empty)
        )
    }

    /// Close the connection from the client side.
    pub fn close(&mut self) {
        self.to_server.take();
    }
}

struct TestTransport {
    inbound: tokio::sync::Mutex<mpsc::UnboundedReceiver<SocketFrame>>,
    outbound: mpsc::UnboundedSender<SocketFrame>,
}

#[async_trait]
impl SessionTransport for TestTransport {
    async fn read_frame(&self) -> AppResult<SocketFrame> {
        self.inbound
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| AppError::internal("connection closed"))
    }

    async fn write_frame(&self, frame: &SocketFrame) -> AppResult<()> {
        self.outbound
            .send(frame.clone())
            .map_err(|_| AppError::internal("connection closed"))
    }
}

fn test_transport() -> (Arc<TestTransport>, TestClient) {
    let (to_server, inbound) = mpsc::unbounded_channel();
    let (outbound, from_server) = mpsc::unbounded_channel();
    let transport = Arc::new(TestTransport {
        inbound: tokio::sync::Mutex::new(inbound),
        outbound,
    });
    let client = TestClient {
        to_server: Some(to_server),
        from_server,
    };
    (transport, client)
}

/// The application behind its real router and state, for exercising the
/// HTTP endpoints and the websocket upgrade path.
pub struct WebApp {
    pub state: AppState,
    router: Router,
}

/// Status and parsed JSON body of one routed request.
pub struct WebResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl WebApp {
    /// Assemble the full application from the default configuration.
    pub fn new() -> Self {
        let state = AppState::new(AppConfig::default());
        let router = build_router(state.clone());
        Self { state, router }
    }

    /// Issue one request against the router, optionally with Basic
    /// credentials and a JSON body.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        auth: Option<(&str, &str)>,
        body: Option<serde_json::Value>,
    ) -> WebResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some((nick, password)) = auth {
            let token =
                base64::engine::general_purpose::STANDARD.encode(format!("{nick}:{password}"));
            builder = builder.header(header::AUTHORIZATION, format!("Basic {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("build request"),
            None => builder.body(Body::empty()).expect("build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        WebResponse { status, body }
    }

    /// Register a profile through the API with the shared test password.
    pub async fn register(&self, nick: &str) -> StatusCode {
        self.request(
            "POST",
            "/api/profiles",
            None,
            Some(serde_json::json!({ "nick": nick, "password": TEST_PASSWORD })),
        )
        .await
        .status
    }

    /// Serve the app on an ephemeral local port for websocket clients.
    pub async fn serve(&self) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let router = self.router.clone();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        addr
    }
}
