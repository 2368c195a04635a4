//! Application assembly — builds state and router, binds the listener.

use tracing::info;

use chathub_core::config::AppConfig;
use chathub_core::error::AppError;

use crate::router::build_router;
use crate::state::AppState;

/// Assemble the application and serve it on the configured address.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.listen_addr();
    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("failed to bind {addr}: {e}")))?;

    info!(addr = %addr, "chathub listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("server error: {e}")))
}
