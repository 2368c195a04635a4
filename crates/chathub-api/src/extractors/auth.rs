//! `BasicAuthUser` extractor — validates the Basic authorization token
//! against the profile store and injects the authenticated nick.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use base64::Engine;
use tokio::time::timeout;

use chathub_core::error::AppError;
use chathub_core::traits::CredentialVerifier;

use crate::state::AppState;

/// Authenticated nick extracted from Basic credentials.
#[derive(Debug, Clone)]
pub struct BasicAuthUser {
    /// The authenticated nick.
    pub nick: String,
}

impl FromRequestParts<AppState> for BasicAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("authorization header is required"))?;

        let token = auth_header
            .strip_prefix("Basic ")
            .ok_or_else(|| AppError::unauthorized("basic token is required"))?;

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(token)
            .map_err(|_| AppError::unauthorized("could not decode provided token"))?;
        let credentials = String::from_utf8(decoded)
            .map_err(|_| AppError::unauthorized("could not decode provided token"))?;
        let (nick, password) = credentials
            .split_once(':')
            .ok_or_else(|| AppError::unauthorized("could not decode provided token"))?;

        let valid = timeout(
            state.config.session.external_call_deadline(),
            state.profiles.is_auth_valid(nick, password),
        )
        .await
        .map_err(|_| AppError::internal("credential verification timed out"))?;

        if !valid {
            return Err(AppError::unauthorized("unauthorized"));
        }

        Ok(Self {
            nick: nick.to_string(),
        })
    }
}
