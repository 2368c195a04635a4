//! Unified application error types for ChatHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The session layer renders an
//! `AppError` into a single `invalid request` frame on the originating
//! connection; the HTTP layer renders it through [`IntoResponse`].

use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::types::response::ApiErrorResponse;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The request was malformed or carried an unknown action.
    InvalidRequest,
    /// Authentication failed (bad credentials, missing token).
    Unauthorized,
    /// An internal server error occurred.
    Internal,
    /// A profile request is missing the `nick` field.
    NickRequired,
    /// A profile request is missing the `password` field.
    PasswordRequired,
    /// The requested nick is already taken.
    NickAlreadyUsed,
    /// No profile exists for the given nick.
    UserNotFound,
    /// The referenced channel does not exist.
    ChannelNotFound,
    /// A channel with this name already exists.
    ChannelAlreadyExists,
    /// The user is not a member of the channel.
    UserNotInChannel,
    /// The user is already a member of the channel.
    UserAlreadyInChannel,
    /// The channel name is empty.
    EmptyChannelName,
    /// The message could not be persisted and was not broadcast.
    MessageNotSent,
    /// The user's action handler has been dissolved.
    HandlerClosed,
    /// Input validation failed (report options, date formats).
    Validation,
    /// A configuration error occurred.
    Configuration,
}

impl ErrorKind {
    /// Canonical human-readable message for this kind, matching the
    /// descriptions clients display verbatim.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid request",
            Self::Unauthorized => "unauthorized",
            Self::Internal => "internal error",
            Self::NickRequired => "nick is required",
            Self::PasswordRequired => "password is required",
            Self::NickAlreadyUsed => "this nick is already used",
            Self::UserNotFound => "user not found",
            Self::ChannelNotFound => "channel not found",
            Self::ChannelAlreadyExists => "channel with this name already exists",
            Self::UserNotInChannel => "user is not member of this channel",
            Self::UserAlreadyInChannel => "user is already member of this channel",
            Self::EmptyChannelName => "channel's `name` is required",
            Self::MessageNotSent => "message could not be sent",
            Self::HandlerClosed => "user handler is closed",
            Self::Validation => "validation failed",
            Self::Configuration => "configuration error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest => write!(f, "INVALID_REQUEST"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::NickRequired => write!(f, "NICK_REQUIRED"),
            Self::PasswordRequired => write!(f, "PASSWORD_REQUIRED"),
            Self::NickAlreadyUsed => write!(f, "NICK_ALREADY_USED"),
            Self::UserNotFound => write!(f, "USER_NOT_FOUND"),
            Self::ChannelNotFound => write!(f, "CHANNEL_NOT_FOUND"),
            Self::ChannelAlreadyExists => write!(f, "CHANNEL_ALREADY_EXISTS"),
            Self::UserNotInChannel => write!(f, "USER_NOT_IN_CHANNEL"),
            Self::UserAlreadyInChannel => write!(f, "USER_ALREADY_IN_CHANNEL"),
            Self::EmptyChannelName => write!(f, "EMPTY_CHANNEL_NAME"),
            Self::MessageNotSent => write!(f, "MESSAGE_NOT_SENT"),
            Self::HandlerClosed => write!(f, "HANDLER_CLOSED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}

/// The unified application error used throughout ChatHub.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create an error carrying the kind's canonical message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind, kind.message())
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.kind {
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::UserNotFound | ErrorKind::ChannelNotFound => StatusCode::NOT_FOUND,
            ErrorKind::NickAlreadyUsed
            | ErrorKind::ChannelAlreadyExists
            | ErrorKind::UserAlreadyInChannel => StatusCode::CONFLICT,
            ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorKind::NickRequired
            | ErrorKind::PasswordRequired
            | ErrorKind::EmptyChannelName
            | ErrorKind::UserNotInChannel
            | ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::MessageNotSent
            | ErrorKind::HandlerClosed
            | ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Internal => {
                tracing::error!(error = %self.message, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiErrorResponse {
            error: self.kind.to_string(),
            message: self.message.clone(),
        };

        (status, Json(body)).into_response()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::InvalidRequest,
            format!("JSON error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
