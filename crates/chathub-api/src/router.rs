//! Route definitions for the ChatHub HTTP API.
//!
//! The request/response endpoints are mounted under `/api`; the messaging
//! endpoint lives at `/ws`. The router receives `AppState` and passes it to
//! all handlers via axum's `State` extractor.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(profile_routes())
        .merge(history_routes())
        .merge(report_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Profile registration, edit and public lookup.
fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profiles", post(handlers::profile::register))
        .route("/profiles/me", put(handlers::profile::edit))
        .route("/profiles/{nick}", get(handlers::profile::get))
}

/// Channel history search.
fn history_routes() -> Router<AppState> {
    Router::new().route("/channels/{name}/history", get(handlers::history::get))
}

/// User activity reports.
fn report_routes() -> Router<AppState> {
    Router::new().route("/reports/activity", get(handlers::activity::get))
}

/// Liveness.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::get))
}
