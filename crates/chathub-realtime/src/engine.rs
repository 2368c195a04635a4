//! Top-level chat engine that ties the concurrency core together.

use std::sync::Arc;

use tracing::info;

use chathub_core::config::SessionConfig;
use chathub_core::traits::{CredentialVerifier, MessageIndex};

use crate::channel::registry::ChannelRegistry;
use crate::session::supervisor::SessionSupervisor;
use crate::session::transport::SessionTransport;
use crate::user::pool::ConnectedUsersPool;

/// Central engine assembling the channel registry and the connected-users
/// pool over the external collaborators.
///
/// The server builds exactly one engine at startup; tests build as many
/// independent instances as they need.
#[derive(Clone)]
pub struct ChatEngine {
    registry: Arc<ChannelRegistry>,
    pool: Arc<ConnectedUsersPool>,
    verifier: Arc<dyn CredentialVerifier>,
    session_config: SessionConfig,
}

impl std::fmt::Debug for ChatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatEngine").finish()
    }
}

impl ChatEngine {
    /// Creates a new engine over the given message sink and credential
    /// verifier.
    pub fn new(
        session_config: SessionConfig,
        index: Arc<dyn MessageIndex>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let registry = Arc::new(ChannelRegistry::new(index));
        let pool = Arc::new(ConnectedUsersPool::new(registry.clone()));

        info!("chat engine initialized");

        Self {
            registry,
            pool,
            verifier,
            session_config,
        }
    }

    /// The channel registry.
    pub fn registry(&self) -> &Arc<ChannelRegistry> {
        &self.registry
    }

    /// The connected-users pool.
    pub fn pool(&self) -> &Arc<ConnectedUsersPool> {
        &self.pool
    }

    /// Serve one connection until it closes; this is the entry point the
    /// websocket handler (and the tests) drive.
    pub async fn serve_session(&self, transport: Arc<dyn SessionTransport>) {
        SessionSupervisor::new(
            self.pool.clone(),
            self.verifier.clone(),
            self.session_config.clone(),
        )
        .run(transport)
        .await;
    }
}
