//! Channel registry — the authoritative source of channel existence and
//! membership, and the coupling point between message persistence and
//! broadcast.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, warn};

use chathub_core::error::{AppError, ErrorKind};
use chathub_core::result::AppResult;
use chathub_core::traits::MessageIndex;
use chathub_core::types::MessageEvent;

use crate::protocol::frames::{SocketFrame, NEW_MESSAGE_EVENT};
use crate::user::handle::UserHandle;

use super::channel::Channel;

/// Registry of all channels.
///
/// Channels are never removed once created; creation is monotonic for the
/// lifetime of the process. The registry map is guarded by its own sharded
/// lock and each channel guards its member set; when both are needed the
/// acquisition order is registry → channel, never the reverse.
#[derive(Debug)]
pub struct ChannelRegistry {
    /// Channel name → channel.
    channels: DashMap<String, Arc<Channel>>,
    /// Message sink consulted before every broadcast.
    index: Arc<dyn MessageIndex>,
}

impl ChannelRegistry {
    /// Creates an empty registry over the given message sink.
    pub fn new(index: Arc<dyn MessageIndex>) -> Self {
        Self {
            channels: DashMap::new(),
            index,
        }
    }

    /// Resolve a channel by name. The registry lock is held only for the
    /// map read; the returned handle is used after release.
    fn channel(&self, name: &str) -> AppResult<Arc<Channel>> {
        if name.is_empty() {
            return Err(AppError::from_kind(ErrorKind::EmptyChannelName));
        }
        self.channels
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::from_kind(ErrorKind::ChannelNotFound))
    }

    /// Create an empty channel. Atomic with respect to other creates on the
    /// same name; a failing create never inserts.
    pub fn create(&self, name: &str) -> AppResult<()> {
        if name.is_empty() {
            return Err(AppError::from_kind(ErrorKind::EmptyChannelName));
        }
        match self.channels.entry(name.to_string()) {
            Entry::Occupied(_) => Err(AppError::from_kind(ErrorKind::ChannelAlreadyExists)),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Channel::new(name)));
                debug!(channel = %name, "channel created");
                Ok(())
            }
        }
    }

    /// Add an actor to a channel's member set and fan the join event out to
    /// every current member including the joiner.
    pub fn add_member(&self, name: &str, user: &Arc<UserHandle>) -> AppResult<()> {
        let channel = self.channel(name)?;
        channel.add_member(user.clone())
    }

    /// Remove an actor from a channel's member set and fan the leave event
    /// out to the remaining members.
    pub fn remove_member(&self, name: &str, nick: &str) -> AppResult<()> {
        let channel = self.channel(name)?;
        channel.remove_member(nick)
    }

    /// Remove an actor from every channel it is a member of.
    ///
    /// Errors from individual channels are swallowed; the actor is going
    /// away regardless. Safe to call concurrently with ordinary operations.
    pub fn disconnect_everywhere(&self, nick: &str) {
        for entry in self.channels.iter() {
            let _ = entry.value().remove_member(nick);
        }
        debug!(nick = %nick, "removed from all channels");
    }

    /// Whether a channel with this name exists.
    pub fn exists(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Whether the nick is currently a member of the channel.
    pub fn is_member(&self, nick: &str, name: &str) -> bool {
        self.channel(name)
            .map(|channel| channel.has_member(nick))
            .unwrap_or(false)
    }

    /// Persist a message and fan it out to every current member of its
    /// channel.
    ///
    /// The sink records the message BEFORE any member sees it; if
    /// persistence fails the message is not broadcast and the caller gets
    /// `MessageNotSent`.
    pub async fn publish(&self, message: MessageEvent) -> AppResult<()> {
        let channel = self.channel(&message.channel)?;
        if let Err(e) = self.index.index(&message).await {
            warn!(channel = %message.channel, error = %e, "message could not be indexed");
            return Err(AppError::from_kind(ErrorKind::MessageNotSent));
        }
        channel.broadcast(SocketFrame::new(NEW_MESSAGE_EVENT, &message));
        Ok(())
    }

    /// Number of channels ever created.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
