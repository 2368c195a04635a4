//! Per-connection supervisor: login, two-phase inactivity deadline, action
//! forwarding, deterministic teardown.

use std::sync::Arc;

use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, info, warn};

use chathub_core::config::SessionConfig;
use chathub_core::traits::CredentialVerifier;

use crate::protocol::frames::{SocketFrame, LOGIN_ACTION};
use crate::protocol::requests::{parse_request, LoginRequest};
use crate::session::transport::{Session, SessionTransport};
use crate::user::handle::UserHandle;
use crate::user::pool::ConnectedUsersPool;

/// Drives one connection end-to-end.
///
/// The supervisor suspends only on the transport read and on the actor
/// submit-reply, and both suspensions respect the current deadline:
/// unauthorized sessions get the short grace, authorized sessions the idle
/// timeout, and every successfully read frame refreshes the current
/// phase's deadline.
pub struct SessionSupervisor {
    pool: Arc<ConnectedUsersPool>,
    verifier: Arc<dyn CredentialVerifier>,
    config: SessionConfig,
}

impl SessionSupervisor {
    /// Creates a supervisor over the given pool and verifier.
    pub fn new(
        pool: Arc<ConnectedUsersPool>,
        verifier: Arc<dyn CredentialVerifier>,
        config: SessionConfig,
    ) -> Self {
        Self {
            pool,
            verifier,
            config,
        }
    }

    /// Serve the connection until it closes, errors or times out.
    pub async fn run(&self, transport: Arc<dyn SessionTransport>) {
        let session = Session::new(transport);
        debug!(session_id = %session.id(), "session opened");

        let mut handle: Option<Arc<UserHandle>> = None;
        let mut deadline = Instant::now() + self.config.timeout_unauthorized();

        loop {
            let frame = match timeout_at(deadline, session.read_frame()).await {
                Err(_) => {
                    // Deadline expired; tell the peer before closing.
                    let _ = session.write_frame(&SocketFrame::timed_out()).await;
                    info!(session_id = %session.id(), "session timed out");
                    break;
                }
                Ok(Err(e)) => {
                    debug!(session_id = %session.id(), error = %e, "session read failed");
                    break;
                }
                Ok(Ok(frame)) => frame,
            };

            match &handle {
                Some(user) => {
                    deadline = Instant::now() + self.config.timeout_authorized();
                    if !self.serve_request(&session, user, frame, deadline).await {
                        let _ = session.write_frame(&SocketFrame::timed_out()).await;
                        info!(session_id = %session.id(), "session timed out");
                        break;
                    }
                }
                None => match self.authorize(&session, frame).await {
                    Some(user) => {
                        deadline = Instant::now() + self.config.timeout_authorized();
                        handle = Some(user);
                    }
                    None => {
                        // Still unauthorized; the frame refreshed the
                        // unauthorized grace, nothing more.
                        deadline = Instant::now() + self.config.timeout_unauthorized();
                    }
                },
            }
        }

        if handle.is_some() {
            self.pool.detach(&session);
        }
        debug!(session_id = %session.id(), "session closed");
    }

    /// Handle the only action an unauthorized session may perform.
    ///
    /// Returns the actor handle on successful login; on any failure the
    /// session stays unauthorized and only receives an `invalid request`
    /// frame.
    async fn authorize(
        &self,
        session: &Arc<Session>,
        frame: SocketFrame,
    ) -> Option<Arc<UserHandle>> {
        if frame.action != LOGIN_ACTION {
            let _ = session
                .write_frame(&SocketFrame::error(format!(
                    "you must log in first using `{LOGIN_ACTION}` action"
                )))
                .await;
            return None;
        }

        let request: LoginRequest = match serde_json::from_value(frame.payload) {
            Ok(request) => request,
            Err(_) => {
                let _ = session.write_frame(&SocketFrame::error("invalid request")).await;
                return None;
            }
        };

        let valid = match timeout(
            self.config.external_call_deadline(),
            self.verifier.is_auth_valid(&request.nick, &request.password),
        )
        .await
        {
            Ok(valid) => valid,
            Err(_) => {
                warn!(session_id = %session.id(), "credential verification timed out");
                let _ = session.write_frame(&SocketFrame::error("internal error")).await;
                return None;
            }
        };

        if !valid {
            let _ = session
                .write_frame(&SocketFrame::error("login rejected: invalid credentials"))
                .await;
            return None;
        }

        let handle = self.pool.attach(session.clone(), &request.nick);
        let _ = session
            .write_frame(&SocketFrame::logged_in(&request.nick))
            .await;
        info!(session_id = %session.id(), nick = %request.nick, "session logged in");
        Some(handle)
    }

    /// Forward one authorized frame to the owning actor.
    ///
    /// Any error outcome becomes a single `invalid request` frame on this
    /// connection only; broadcast events are never rolled back. Returns
    /// `false` when the deadline expired while awaiting the reply.
    async fn serve_request(
        &self,
        session: &Arc<Session>,
        handle: &Arc<UserHandle>,
        frame: SocketFrame,
        deadline: Instant,
    ) -> bool {
        let action = match parse_request(&frame) {
            Ok(action) => action,
            Err(e) => {
                let _ = session.write_frame(&SocketFrame::error(e.message)).await;
                return true;
            }
        };

        match timeout_at(deadline, handle.submit(action)).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                let _ = session.write_frame(&SocketFrame::error(e.message)).await;
                true
            }
            // The reply slot is single-shot; an abandoned submit completes
            // in the actor and is discarded.
            Err(_) => false,
        }
    }
}
