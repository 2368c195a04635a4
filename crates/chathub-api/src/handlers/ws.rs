//! WebSocket upgrade handler and the websocket-backed session transport.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use chathub_core::error::AppError;
use chathub_core::result::AppResult;
use chathub_realtime::protocol::frames::SocketFrame;
use chathub_realtime::session::transport::SessionTransport;

use crate::state::AppState;

/// GET /ws — upgrade and hand the socket to the session supervisor.
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, socket))
}

/// Runs one established WebSocket connection to completion.
async fn handle_ws_connection(state: AppState, socket: WebSocket) {
    let transport = Arc::new(WsTransport::new(socket));
    state.engine.serve_session(transport).await;
}

/// [`SessionTransport`] over an axum WebSocket.
pub struct WsTransport {
    reader: Mutex<SplitStream<WebSocket>>,
    writer: Mutex<SplitSink<WebSocket, Message>>,
}

impl WsTransport {
    /// Split the socket into the transport's read and write halves.
    pub fn new(socket: WebSocket) -> Self {
        let (writer, reader) = socket.split();
        Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
        }
    }
}

#[async_trait]
impl SessionTransport for WsTransport {
    async fn read_frame(&self) -> AppResult<SocketFrame> {
        loop {
            let message = self.reader.lock().await.next().await;
            match message {
                None => return Err(AppError::internal("connection closed")),
                Some(Err(e)) => {
                    debug!(error = %e, "websocket read failed");
                    return Err(AppError::internal(format!("websocket error: {e}")));
                }
                Some(Ok(Message::Text(text))) => {
                    // A frame that is not valid JSON still reaches the
                    // supervisor (with an empty action) and is answered
                    // with `invalid request`; only read errors are fatal.
                    return Ok(serde_json::from_str(&text).unwrap_or(SocketFrame {
                        action: String::new(),
                        payload: Value::Null,
                    }));
                }
                Some(Ok(Message::Close(_))) => {
                    return Err(AppError::internal("connection closed"));
                }
                // Ping/pong are handled by axum; binary frames are ignored.
                Some(Ok(_)) => continue,
            }
        }
    }

    async fn write_frame(&self, frame: &SocketFrame) -> AppResult<()> {
        let text = serde_json::to_string(frame)?;
        self.writer
            .lock()
            .await
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| AppError::internal(format!("websocket write failed: {e}")))
    }
}
