//! Request envelopes flowing through a user actor's queues.

use tokio::sync::oneshot;

use chathub_core::result::AppResult;

use crate::protocol::frames::SocketFrame;
use crate::protocol::requests::UserAction;

/// One pending action with its reply slot.
///
/// The slot is single-shot: the consumer posts the outcome exactly once and
/// a receiver that has gone away (session torn down mid-flight) is simply
/// discarded.
#[derive(Debug)]
pub struct ActionRequest {
    /// The validated action to execute.
    pub action: UserAction,
    /// Reply slot delivering the outcome to the originating session.
    pub reply: oneshot::Sender<AppResult<()>>,
}

/// Input to the actor's consumer loop.
#[derive(Debug)]
pub(crate) enum ActorMessage {
    /// Execute an action and post the outcome to its reply slot.
    Request(ActionRequest),
    /// Stop the consumer loop. Requests already queued behind this marker
    /// are dropped; their reply slots close and submitters observe
    /// `HandlerClosed`.
    Shutdown,
}

/// Input to the actor's writer loop.
#[derive(Debug)]
pub(crate) enum WriterMessage {
    /// Fan a frame out to every session of this actor.
    Event(SocketFrame),
    /// Stop the writer loop.
    Shutdown,
}
