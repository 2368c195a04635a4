//! Session timeout configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session lifecycle configuration.
///
/// Connections that have not logged in successfully are disconnected after
/// the unauthorized grace; authorized connections are disconnected after the
/// (longer) idle timeout. Every successfully read frame refreshes the
/// current deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle timeout in seconds for authorized sessions.
    #[serde(default = "default_timeout_authorized")]
    pub timeout_authorized_secs: u64,
    /// Grace period in seconds for sessions that have not logged in yet.
    #[serde(default = "default_timeout_unauthorized")]
    pub timeout_unauthorized_secs: u64,
    /// Per-call deadline in seconds for external collaborators
    /// (credential verifier, message index).
    #[serde(default = "default_external_deadline")]
    pub external_call_deadline_secs: u64,
}

impl SessionConfig {
    /// Authorized idle timeout as a [`Duration`].
    pub fn timeout_authorized(&self) -> Duration {
        Duration::from_secs(self.timeout_authorized_secs)
    }

    /// Unauthorized grace as a [`Duration`].
    pub fn timeout_unauthorized(&self) -> Duration {
        Duration::from_secs(self.timeout_unauthorized_secs)
    }

    /// External-call deadline as a [`Duration`].
    pub fn external_call_deadline(&self) -> Duration {
        Duration::from_secs(self.external_call_deadline_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_authorized_secs: default_timeout_authorized(),
            timeout_unauthorized_secs: default_timeout_unauthorized(),
            external_call_deadline_secs: default_external_deadline(),
        }
    }
}

fn default_timeout_authorized() -> u64 {
    600
}

fn default_timeout_unauthorized() -> u64 {
    60
}

fn default_external_deadline() -> u64 {
    3
}
