//! A single channel: a named room with a membership set.
//!
//! Every operation that mutates the member set or fans an event out runs
//! inside the member lock's critical section, and the fan-out only ENQUEUES
//! to each member actor's event queue (a non-blocking send). This is what
//! guarantees that every member observes a channel's join/leave/message
//! events in the same total order, while the actual socket writes happen on
//! the member actors and never hold this lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chathub_core::error::{AppError, ErrorKind};
use chathub_core::result::AppResult;

use crate::protocol::frames::{
    ChannelUserChange, SocketFrame, USER_JOINED_CHANNEL_EVENT, USER_LEFT_CHANNEL_EVENT,
};
use crate::user::handle::UserHandle;

/// A chat room with a membership set keyed by nick.
#[derive(Debug)]
pub struct Channel {
    /// Channel name, unique within the registry.
    name: String,
    /// Member actors. Held only for the duration of each actor's pool
    /// registration; the pool sweeps dissolved actors out.
    members: Mutex<HashMap<String, Arc<UserHandle>>>,
}

impl Channel {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Mutex::new(HashMap::new()),
        }
    }

    /// The channel's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the nick is currently a member.
    pub fn has_member(&self, nick: &str) -> bool {
        self.members
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(nick)
    }

    /// Number of current members.
    pub fn member_count(&self) -> usize {
        self.members
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Add a member and announce the join to every member, the joiner
    /// included.
    ///
    /// The membership insert and the event enqueue happen in one critical
    /// section, so the channel never advertises the identity as a member
    /// before the join event is enqueued.
    pub(crate) fn add_member(&self, user: Arc<UserHandle>) -> AppResult<()> {
        let mut members = self.members.lock().unwrap_or_else(PoisonError::into_inner);
        if members.contains_key(user.nick()) {
            return Err(AppError::from_kind(ErrorKind::UserAlreadyInChannel));
        }
        let event = SocketFrame::new(
            USER_JOINED_CHANNEL_EVENT,
            ChannelUserChange {
                channel: self.name.clone(),
                nick: user.nick().to_string(),
            },
        );
        members.insert(user.nick().to_string(), user);
        for member in members.values() {
            member.enqueue_event(event.clone());
        }
        Ok(())
    }

    /// Remove a member and announce the leave to the REMAINING members.
    ///
    /// The leaver is removed before the fan-out and therefore does not
    /// receive this event; their own actor emits the self-only
    /// `you have left the channel` instead.
    pub(crate) fn remove_member(&self, nick: &str) -> AppResult<()> {
        let mut members = self.members.lock().unwrap_or_else(PoisonError::into_inner);
        if members.remove(nick).is_none() {
            return Err(AppError::from_kind(ErrorKind::UserNotInChannel));
        }
        let event = SocketFrame::new(
            USER_LEFT_CHANNEL_EVENT,
            ChannelUserChange {
                channel: self.name.clone(),
                nick: nick.to_string(),
            },
        );
        for member in members.values() {
            member.enqueue_event(event.clone());
        }
        Ok(())
    }

    /// Enqueue an event to every current member.
    pub(crate) fn broadcast(&self, event: SocketFrame) {
        let members = self.members.lock().unwrap_or_else(PoisonError::into_inner);
        for member in members.values() {
            member.enqueue_event(event.clone());
        }
    }
}
