//! HTTP and WebSocket request handlers.

pub mod activity;
pub mod health;
pub mod history;
pub mod profile;
pub mod ws;

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use chathub_core::error::AppError;
use chathub_core::result::AppResult;

/// Bound an external-collaborator call with the configured deadline.
pub(crate) async fn with_deadline<T>(
    deadline: Duration,
    call: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    timeout(deadline, call)
        .await
        .map_err(|_| AppError::internal("request timed out"))?
}
