//! Connected-users pool — reference-counts sessions by identity and owns
//! the actor map.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use chathub_core::types::SessionId;

use crate::channel::registry::ChannelRegistry;
use crate::session::transport::Session;

use super::handle::{run_writer, UserHandle};
use super::worker;

/// Registry of live user actors keyed by identity.
///
/// Ensures exactly one actor per identity regardless of how many concurrent
/// logins that identity produces: the first inserter wins, later callers
/// attach their session to the existing actor. When an identity's last
/// session detaches, the actor is dissolved and removed from every channel.
#[derive(Debug)]
pub struct ConnectedUsersPool {
    /// Both maps under one lock; attach/detach are short critical sections.
    inner: Mutex<PoolMaps>,
    /// Channel registry, used for the disconnect-everywhere sweep.
    registry: Arc<ChannelRegistry>,
}

#[derive(Debug, Default)]
struct PoolMaps {
    /// Identity → actor handle.
    handlers: HashMap<String, Arc<UserHandle>>,
    /// Session → identity, for detach routing.
    sessions: HashMap<SessionId, String>,
}

impl ConnectedUsersPool {
    /// Creates an empty pool over the given registry.
    pub fn new(registry: Arc<ChannelRegistry>) -> Self {
        Self {
            inner: Mutex::new(PoolMaps::default()),
            registry,
        }
    }

    /// Attach a session to its identity's actor, creating the actor (and
    /// starting its loops) on the identity's first session.
    pub fn attach(&self, session: Arc<Session>, nick: &str) -> Arc<UserHandle> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = inner
            .handlers
            .entry(nick.to_string())
            .or_insert_with(|| spawn_actor(nick.to_string(), self.registry.clone()))
            .clone();
        inner.sessions.insert(session.id(), nick.to_string());
        // Added under the pool lock so a racing detach of a sibling session
        // observes a consistent session count.
        handle.add_session(session);
        debug!(nick = %nick, sessions = handle.session_count(), "session attached");
        handle
    }

    /// Detach a session; dissolves the actor when this was the identity's
    /// last session.
    pub fn detach(&self, session: &Session) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(nick) = inner.sessions.remove(&session.id()) else {
            return;
        };
        let Some(handle) = inner.handlers.get(&nick).cloned() else {
            warn!(nick = %nick, "could not drop session - no handler found");
            return;
        };
        handle.remove_session(&session.id());
        if handle.session_count() > 0 {
            debug!(nick = %nick, sessions = handle.session_count(), "session detached");
            return;
        }
        inner.handlers.remove(&nick);
        drop(inner);

        // The sweep and the queue close run outside the pool lock; the
        // actor map no longer advertises the handle, so new logins for the
        // same nick get a fresh actor.
        self.registry.disconnect_everywhere(&nick);
        handle.close();
        info!(nick = %nick, "user disconnected, actor dissolved");
    }

    /// Look up the actor for an identity.
    pub fn handler_of(&self, nick: &str) -> Option<Arc<UserHandle>> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handlers
            .get(nick)
            .cloned()
    }

    /// Number of identities with at least one live session.
    pub fn connected_users(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handlers
            .len()
    }
}

/// Create an actor handle and start its consumer and writer loops.
fn spawn_actor(nick: String, registry: Arc<ChannelRegistry>) -> Arc<UserHandle> {
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let handle = Arc::new(UserHandle::new(nick, request_tx, event_tx));
    tokio::spawn(worker::run(handle.clone(), registry, request_rx));
    tokio::spawn(run_writer(handle.clone(), event_rx));
    handle
}
