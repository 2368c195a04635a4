//! Common HTTP response envelopes.

use serde::{Deserialize, Serialize};

/// Error body returned by all HTTP endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Stable error code.
    pub error: String,
    /// Human-readable description.
    pub message: String,
}

/// Empty success body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmptyResponse {}
