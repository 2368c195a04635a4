//! The persisted and broadcast message shape.

use serde::{Deserialize, Serialize};

/// A chat message as broadcast to members and persisted in the index.
///
/// `author` and `timestamp` are always set by the server from the
/// authenticated identity; payload-supplied values are never trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Message text.
    pub text: String,
    /// Channel the message was published to.
    pub channel: String,
    /// Authenticated nick of the author.
    pub author: String,
    /// Wall-clock send time, unix seconds.
    pub timestamp: i64,
}

/// Channel history as returned by the message index, newest first.
pub type ChannelHistory = Vec<MessageEvent>;
