//! The transport capability a session requires from its connection.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use chathub_core::result::AppResult;
use chathub_core::types::SessionId;

use crate::protocol::frames::SocketFrame;

/// What the core needs from a connection: read the next frame, write a
/// frame. Concrete websocket framing lives behind this seam; tests plug in
/// channel-backed doubles.
#[async_trait]
pub trait SessionTransport: Send + Sync + 'static {
    /// Read the next frame from the peer.
    ///
    /// Returns an error when the transport is closed or broken. The
    /// inactivity deadline is applied by the supervisor around this call.
    async fn read_frame(&self) -> AppResult<SocketFrame>;

    /// Write one frame to the peer.
    async fn write_frame(&self, frame: &SocketFrame) -> AppResult<()>;
}

/// One live connection.
///
/// A session is unauthorized until login succeeds, belongs to exactly one
/// actor's session set while authorized, and is destroyed on transport
/// error, close or deadline expiry.
pub struct Session {
    id: SessionId,
    transport: Arc<dyn SessionTransport>,
}

impl Session {
    /// Wrap a transport in a fresh session.
    pub fn new(transport: Arc<dyn SessionTransport>) -> Arc<Self> {
        Arc::new(Self {
            id: SessionId::new(),
            transport,
        })
    }

    /// The session's unique identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Read the next frame from the connection.
    pub async fn read_frame(&self) -> AppResult<SocketFrame> {
        self.transport.read_frame().await
    }

    /// Write one frame to the connection.
    pub async fn write_frame(&self, frame: &SocketFrame) -> AppResult<()> {
        self.transport.write_frame(frame).await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("id", &self.id).finish()
    }
}
