//! The user actor handle — the single-writer coordinator for all sessions
//! of one identity.
//!
//! A handle owns two queues: the request queue, consumed one action at a
//! time by [`worker::run`](super::worker::run), and the outbound event
//! queue, drained by a writer task that fans each event out to every live
//! session. Channel fan-out enqueues here while holding the channel's
//! member lock, which is what gives every member the same view of a
//! channel's event order; the actual socket writes happen on this actor's
//! writer task and never block the registry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::join_all;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use chathub_core::error::{AppError, ErrorKind};
use chathub_core::result::AppResult;
use chathub_core::types::SessionId;

use crate::protocol::frames::SocketFrame;
use crate::protocol::requests::UserAction;
use crate::session::transport::Session;

use super::request::{ActionRequest, ActorMessage, WriterMessage};

/// Handle to one identity's actor.
///
/// Cheap to share (`Arc`); channels hold it in their member sets for the
/// duration of the identity's pool registration.
#[derive(Debug)]
pub struct UserHandle {
    /// The authenticated identity. Immutable.
    nick: String,
    /// Live sessions of this identity. Mutated only by the pool.
    sessions: Mutex<HashMap<SessionId, Arc<Session>>>,
    /// Inbound action queue, single consumer.
    requests: mpsc::UnboundedSender<ActorMessage>,
    /// Ordered outbound event queue, single writer.
    events: mpsc::UnboundedSender<WriterMessage>,
    /// Set once the pool dissolves the actor.
    closed: AtomicBool,
}

impl UserHandle {
    pub(crate) fn new(
        nick: String,
        requests: mpsc::UnboundedSender<ActorMessage>,
        events: mpsc::UnboundedSender<WriterMessage>,
    ) -> Self {
        Self {
            nick,
            sessions: Mutex::new(HashMap::new()),
            requests,
            events,
            closed: AtomicBool::new(false),
        }
    }

    /// The identity this actor serializes actions for.
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Submit an action and suspend until the actor replies.
    ///
    /// Submissions from different sessions are serialized in arrival order
    /// at the queue; submissions from one session preserve their submission
    /// order. Fails with `HandlerClosed` after dissolution.
    pub async fn submit(&self, action: UserAction) -> AppResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(AppError::from_kind(ErrorKind::HandlerClosed));
        }
        let (reply, outcome) = oneshot::channel();
        self.requests
            .send(ActorMessage::Request(ActionRequest { action, reply }))
            .map_err(|_| AppError::from_kind(ErrorKind::HandlerClosed))?;
        outcome
            .await
            .map_err(|_| AppError::from_kind(ErrorKind::HandlerClosed))?
    }

    /// Enqueue an event for delivery to every session of this actor.
    ///
    /// Delivery order equals enqueue order; events enqueued after
    /// dissolution are dropped.
    pub fn enqueue_event(&self, frame: SocketFrame) {
        let _ = self.events.send(WriterMessage::Event(frame));
    }

    /// Write one frame to every session of this actor.
    ///
    /// Writes proceed concurrently and all complete before this returns.
    /// Individual write failures are logged and dropped.
    pub async fn write(&self, frame: &SocketFrame) {
        let sessions: Vec<Arc<Session>> = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        let results = join_all(sessions.iter().map(|s| s.write_frame(frame))).await;
        for (session, result) in sessions.iter().zip(results) {
            if let Err(e) = result {
                warn!(
                    nick = %self.nick,
                    session_id = %session.id(),
                    error = %e,
                    "failed to write event to session"
                );
            }
        }
    }

    /// Add a session to this actor. Pool use only.
    pub(crate) fn add_session(&self, session: Arc<Session>) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.id(), session);
    }

    /// Remove a session from this actor. Pool use only.
    pub(crate) fn remove_session(&self, id: &SessionId) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Dissolve the actor: reject new submits and stop both loops once the
    /// already-queued work drains. Pool use only.
    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::Release);
        let _ = self.requests.send(ActorMessage::Shutdown);
        let _ = self.events.send(WriterMessage::Shutdown);
    }
}

/// Writer loop: drains the outbound event queue, completing the fan-out of
/// one event to all sessions before starting the next. This preserves, per
/// session, the order in which the registry enqueued channel events.
pub(crate) async fn run_writer(
    handle: Arc<UserHandle>,
    mut events: mpsc::UnboundedReceiver<WriterMessage>,
) {
    while let Some(message) = events.recv().await {
        match message {
            WriterMessage::Event(frame) => handle.write(&frame).await,
            WriterMessage::Shutdown => break,
        }
    }
}
