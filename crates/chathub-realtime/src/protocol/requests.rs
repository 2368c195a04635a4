//! Typed client request payloads and frame parsing.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use chathub_core::error::{AppError, ErrorKind};
use chathub_core::result::AppResult;

use super::frames::{
    SocketFrame, CREATE_ACTION, JOIN_ACTION, LEAVE_ACTION, SEND_MESSAGE_ACTION,
};

/// Payload of the `login` action.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Nick to authenticate as.
    #[serde(default)]
    pub nick: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
}

/// Payload of the `create`, `join` and `leave` actions.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelRequest {
    /// Channel name.
    #[serde(default)]
    pub name: String,
}

/// Payload of the `send_message` action.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    /// Target channel.
    #[serde(default)]
    pub channel: String,
    /// Message text.
    #[serde(default)]
    pub text: String,
}

/// A validated channel-affecting action, ready to submit to a user actor.
#[derive(Debug, Clone)]
pub enum UserAction {
    /// Create a channel and join it.
    Create(ChannelRequest),
    /// Join an existing channel.
    Join(ChannelRequest),
    /// Leave a joined channel.
    Leave(ChannelRequest),
    /// Publish a message.
    Send(SendMessageRequest),
}

/// Parse an authorized frame into a [`UserAction`].
///
/// Unknown actions and malformed payloads fail with `InvalidRequest`;
/// parse failures never terminate the session.
pub fn parse_request(frame: &SocketFrame) -> AppResult<UserAction> {
    match frame.action.as_str() {
        CREATE_ACTION => Ok(UserAction::Create(parse_payload(frame)?)),
        JOIN_ACTION => Ok(UserAction::Join(parse_payload(frame)?)),
        LEAVE_ACTION => Ok(UserAction::Leave(parse_payload(frame)?)),
        SEND_MESSAGE_ACTION => Ok(UserAction::Send(parse_payload(frame)?)),
        _ => Err(AppError::from_kind(ErrorKind::InvalidRequest)),
    }
}

fn parse_payload<T: DeserializeOwned>(frame: &SocketFrame) -> AppResult<T> {
    serde_json::from_value(frame.payload.clone())
        .map_err(|_| AppError::from_kind(ErrorKind::InvalidRequest))
}
