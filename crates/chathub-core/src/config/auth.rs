//! Credential verification configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Credential verifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// TTL in seconds for cached credential lookups.
    ///
    /// Entries are also invalidated eagerly when the profile mutates.
    #[serde(default = "default_cache_ttl")]
    pub credential_cache_ttl_secs: u64,
    /// Maximum number of cached profiles.
    #[serde(default = "default_cache_capacity")]
    pub credential_cache_max_capacity: u64,
}

impl AuthConfig {
    /// Cache TTL as a [`Duration`].
    pub fn credential_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.credential_cache_ttl_secs)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credential_cache_ttl_secs: default_cache_ttl(),
            credential_cache_max_capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_ttl() -> u64 {
    10
}

fn default_cache_capacity() -> u64 {
    10_000
}
