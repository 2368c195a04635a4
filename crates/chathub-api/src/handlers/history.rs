//! Channel history endpoint.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use chathub_core::error::{AppError, ErrorKind};
use chathub_core::result::AppResult;
use chathub_core::traits::MessageIndex;
use chathub_core::types::MessageEvent;

use crate::extractors::auth::BasicAuthUser;
use crate::state::AppState;

use super::with_deadline;

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Optional sought phrase narrowing the results.
    pub search: Option<String>,
}

/// GET /api/channels/{name}/history?search= — search a channel's messages.
pub async fn get(
    State(state): State<AppState>,
    _user: BasicAuthUser,
    Path(name): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<MessageEvent>>> {
    if !state.engine.registry().exists(&name) {
        return Err(AppError::from_kind(ErrorKind::ChannelNotFound));
    }
    let messages = with_deadline(
        state.config.session.external_call_deadline(),
        state.index.find(&name, query.search.as_deref()),
    )
    .await?;
    Ok(Json(messages))
}
