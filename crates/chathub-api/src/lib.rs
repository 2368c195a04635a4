//! HTTP and WebSocket surface for ChatHub.
//!
//! Assembles the chat engine, profile service and message index into an
//! axum application: the `/ws` messaging endpoint plus the profile,
//! history and activity-report request/response endpoints under `/api`.

pub mod app;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use state::AppState;
