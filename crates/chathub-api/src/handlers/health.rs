//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api/health — liveness probe with basic engine counters.
pub async fn get(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "channels": state.engine.registry().channel_count(),
        "connected_users": state.engine.pool().connected_users(),
    }))
}
