//! Credential verifier trait — the external authenticator.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::profile::PublicProfile;

/// Trait for validating credentials against the profile store.
///
/// Implementations should interpose a short-lived cache keyed by nick and
/// must invalidate entries when the profile mutates. Callers bound every
/// call with the configured external-call deadline.
#[async_trait]
pub trait CredentialVerifier: Send + Sync + std::fmt::Debug + 'static {
    /// Whether the (nick, password) pair is valid.
    async fn is_auth_valid(&self, nick: &str, password: &str) -> bool;

    /// Fetch the public profile for a nick.
    async fn profile_of(&self, nick: &str) -> AppResult<PublicProfile>;
}
