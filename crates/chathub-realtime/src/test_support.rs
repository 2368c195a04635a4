//! Shared doubles for the crate's unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use chathub_core::error::AppError;
use chathub_core::result::AppResult;
use chathub_core::traits::{CredentialVerifier, MessageIndex};
use chathub_core::types::reports::{UserActivityReport, UserActivityReportOptions};
use chathub_core::types::{MessageEvent, PublicProfile};

use crate::protocol::frames::SocketFrame;
use crate::session::transport::SessionTransport;

/// Channel-backed transport double.
pub(crate) struct ChannelTransport {
    inbound: tokio::sync::Mutex<mpsc::UnboundedReceiver<SocketFrame>>,
    outbound: mpsc::UnboundedSender<SocketFrame>,
}

#[async_trait]
impl SessionTransport for ChannelTransport {
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

/// Client-side ends of a [`ChannelTransport`].
pub(crate) struct TestPeer {
    /// Frames "sent" by the client; dropping this closes the transport.
    pub to_server: Option<mpsc::UnboundedSender<SocketFrame>>,
    /// Frames written by the server.
    pub from_server: mpsc::UnboundedReceiver<SocketFrame>,
}

impl TestPeer {
    /// Send one frame to the server.
    pub fn send(&self, frame: SocketFrame) {
        self.to_server
            .as_ref()
            .expect("transport already closed")
            .send(frame)
            .expect("server dropped the transport");
    }

    /// Await the next frame written to this peer, bounded to keep broken
    /// tests from hanging.
    pub async fn recv(&mut self) -> SocketFrame {
        tokio::time::timeout(Duration::from_secs(5), self.from_server.recv())
            .await
            .expect("timed out waiting for a frame")
            .expect("server closed the transport")
    }

    /// Whether no frame is currently queued for this peer.
    pub fn is_idle(&mut self) -> bool {
        matches!(
            self.from_server.try_recv(),
            Err(mpsc::error::TryRecvError::Empty)
        )
    }

    /// Close the client side of the transport.
    pub fn close(&mut self) {
        self.to_server.take();
    }
}

/// Build a connected (transport, peer) pair.
pub(crate) fn transport_pair() -> (Arc<ChannelTransport>, TestPeer) {
    let (to_server, inbound) = mpsc::unbounded_channel();
    let (outbound, from_server) = mpsc::unbounded_channel();
    let transport = Arc::new(ChannelTransport {
        inbound: tokio::sync::Mutex::new(inbound),
        outbound,
    });
    let peer = TestPeer {
        to_server: Some(to_server),
        from_server,
    };
    (transport, peer)
}

/// Message index double recording every indexed message; can be switched
/// into failure mode.
#[derive(Debug, Default)]
pub(crate) struct StubIndex {
    pub fail: AtomicBool,
    pub indexed: Mutex<Vec<MessageEvent>>,
}

impl StubIndex {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn indexed_count(&self) -> usize {
        self.indexed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl MessageIndex for StubIndex {
    async fn index(&self, message: &MessageEvent) -> AppResult<String> {
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(AppError::internal("index unavailable"));
        }
        self.indexed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        Ok("doc".to_string())
    }

    async fn find(&self, channel: &str, _phrase: Option<&str>) -> AppResult<Vec<MessageEvent>> {
        Ok(self
            .indexed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|m| m.channel == channel)
            .cloned()
            .collect())
    }

    async fn user_activity(
        &self,
        opts: &UserActivityReportOptions,
    ) -> AppResult<UserActivityReport> {
        Ok(UserActivityReport {
            channel_activity: Default::default(),
            from: opts.from,
            to: opts.to,
        })
    }
}

/// Verifier double accepting one fixed credential pair.
#[derive(Debug)]
pub(crate) struct StubVerifier {
    pub nick: String,
    pub password: String,
}

impl StubVerifier {
    pub fn accepting(nick: &str, password: &str) -> Arc<Self> {
        Arc::new(Self {
            nick: nick.to_string(),
            password: password.to_string(),
        })
    }
}

#[async_trait]
impl CredentialVerifier for StubVerifier {
    async fn is_auth_valid(&self, nick: &str, password: &str) -> bool {
        nick == self.nick && password == self.password
    }

    async fn profile_of(&self, nick: &str) -> AppResult<PublicProfile> {
        Ok(PublicProfile {
            nick: nick.to_string(),
            description: String::new(),
        })
    }
}
