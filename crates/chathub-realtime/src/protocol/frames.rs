//! Socket frames exchanged with clients.
//!
//! Every frame is a JSON object `{"action": string, "payload": object}`.
//! The `logged_in:<nick>` confirmation carries the nick in the action
//! string itself, so actions are plain strings rather than a closed enum.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// C→S: authenticate this connection.
pub const LOGIN_ACTION: &str = "login";
/// C→S: create a channel and join it.
pub const CREATE_ACTION: &str = "create";
/// C→S: join an existing channel.
pub const JOIN_ACTION: &str = "join";
/// C→S: leave a joined channel.
pub const LEAVE_ACTION: &str = "leave";
/// C→S: publish a message to a joined channel.
pub const SEND_MESSAGE_ACTION: &str = "send_message";

/// S→C: somebody (possibly you) joined a channel you are in.
pub const USER_JOINED_CHANNEL_EVENT: &str = "user has joined the channel";
/// S→C: somebody else left a channel you are in.
pub const USER_LEFT_CHANNEL_EVENT: &str = "user has left the channel";
/// S→C: your own leave completed.
pub const YOU_LEFT_CHANNEL_EVENT: &str = "you have left the channel";
/// S→C: a message was published to a channel you are in.
pub const NEW_MESSAGE_EVENT: &str = "new message in channel";
/// S→C: the previous request failed; payload carries a description.
pub const INVALID_REQUEST_EVENT: &str = "invalid request";
/// S→C: the inactivity deadline expired; the connection is closing.
pub const CONNECTION_TIMED_OUT_EVENT: &str = "connection_timed_out";
/// S→C action prefix for the login confirmation.
pub const LOGGED_IN_PREFIX: &str = "logged_in:";

/// One wire frame in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketFrame {
    /// Action string; determines the payload schema.
    pub action: String,
    /// Action-specific payload.
    #[serde(default)]
    pub payload: Value,
}

impl SocketFrame {
    /// Build a frame from an action string and a serializable payload.
    pub fn new(action: impl Into<String>, payload: impl Serialize) -> Self {
        let payload = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize frame payload");
                Value::Null
            }
        };
        Self {
            action: action.into(),
            payload,
        }
    }

    /// Build an `invalid request` frame with a human-readable description.
    pub fn error(description: impl Into<String>) -> Self {
        Self::new(
            INVALID_REQUEST_EVENT,
            serde_json::json!({ "description": description.into() }),
        )
    }

    /// Build the login confirmation frame for a nick.
    pub fn logged_in(nick: &str) -> Self {
        Self::new(format!("{LOGGED_IN_PREFIX}{nick}"), serde_json::json!({}))
    }

    /// Build the inactivity-timeout frame.
    pub fn timed_out() -> Self {
        Self::new(CONNECTION_TIMED_OUT_EVENT, serde_json::json!({}))
    }
}

/// Payload of the join/leave membership events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelUserChange {
    /// Channel the membership change happened in.
    pub channel: String,
    /// Nick of the user who joined or left.
    pub nick: String,
}
