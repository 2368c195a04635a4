//! Profile repository trait for pluggable profile storage.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::profile::{PublicProfile, StoredProfile};

/// Trait for the persistent profile store backing credential verification.
///
/// Implementations must treat nicks as unique keys; `insert` fails with
/// [`crate::error::ErrorKind::NickAlreadyUsed`] on conflict and `select`
/// fails with [`crate::error::ErrorKind::UserNotFound`] for unknown nicks.
#[async_trait]
pub trait ProfileRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new profile. Fails on nick conflict.
    async fn insert(&self, profile: &StoredProfile) -> AppResult<()>;

    /// Update the public part of an existing profile.
    async fn update_public(&self, profile: &PublicProfile) -> AppResult<()>;

    /// Fetch the full stored profile for a nick.
    async fn select(&self, nick: &str) -> AppResult<StoredProfile>;
}
