//! The user actor's consumer loop.
//!
//! Exactly one consumer runs per actor, dequeuing one request at a time.
//! This is the only place an identity's channel-affecting actions execute,
//! so no lock protects the actor's execution state.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::debug;

use chathub_core::error::{AppError, ErrorKind};
use chathub_core::result::AppResult;
use chathub_core::types::MessageEvent;

use crate::channel::registry::ChannelRegistry;
use crate::protocol::frames::{ChannelUserChange, SocketFrame, YOU_LEFT_CHANNEL_EVENT};
use crate::protocol::requests::UserAction;

use super::handle::UserHandle;
use super::request::ActorMessage;

/// Consumer loop for one user actor.
///
/// Runs until the pool sends the shutdown marker. Requests queued before the
/// marker are fully processed; requests queued after it are dropped and
/// their submitters observe `HandlerClosed` through the closed reply slot.
pub(crate) async fn run(
    handle: Arc<UserHandle>,
    registry: Arc<ChannelRegistry>,
    mut requests: mpsc::UnboundedReceiver<ActorMessage>,
) {
    while let Some(message) = requests.recv().await {
        let request = match message {
            ActorMessage::Request(request) => request,
            ActorMessage::Shutdown => break,
        };
        let outcome = execute(&handle, &registry, request.action).await;
        // The originating session may have torn down mid-flight; the slot
        // is single-shot and simply discarded in that case.
        let _ = request.reply.send(outcome);
    }
    debug!(nick = %handle.nick(), "user actor stopped");
}

async fn execute(
    handle: &Arc<UserHandle>,
    registry: &ChannelRegistry,
    action: UserAction,
) -> AppResult<()> {
    match action {
        UserAction::Create(req) => {
            registry.create(&req.name)?;
            registry.add_member(&req.name, handle)
        }
        UserAction::Join(req) => registry.add_member(&req.name, handle),
        UserAction::Leave(req) => {
            registry.remove_member(&req.name, handle.nick())?;
            // The member was removed before the fan-out, so the channel's
            // own `user has left` event never reaches the leaver; this
            // self-only event is the leaver's notification.
            handle.enqueue_event(SocketFrame::new(
                YOU_LEFT_CHANNEL_EVENT,
                ChannelUserChange {
                    channel: req.name,
                    nick: handle.nick().to_string(),
                },
            ));
            Ok(())
        }
        UserAction::Send(req) => {
            if !registry.is_member(handle.nick(), &req.channel) {
                return Err(AppError::from_kind(ErrorKind::UserNotInChannel));
            }
            let message = MessageEvent {
                text: req.text,
                channel: req.channel,
                author: handle.nick().to_string(),
                timestamp: Utc::now().timestamp(),
            };
            registry.publish(message).await
        }
    }
}
