//! Profile service: registration, edits, lookups and credential checks.
//!
//! Credential checks read through a short-lived cache keyed by nick. Cache
//! entries are invalidated when the profile mutates, so edits are visible
//! within one lookup.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use chathub_core::config::AuthConfig;
use chathub_core::error::{AppError, ErrorKind};
use chathub_core::result::AppResult;
use chathub_core::traits::{CredentialVerifier, ProfileRepository};
use chathub_core::types::{CreateProfileRequest, EditProfileRequest, PublicProfile, StoredProfile};

use crate::password;

/// Manages profiles and answers credential checks for the chat core.
#[derive(Debug)]
pub struct ProfileService {
    store: Arc<dyn ProfileRepository>,
    /// Read-through cache for credential lookups.
    cache: Cache<String, StoredProfile>,
}

impl ProfileService {
    /// Creates a profile service over the given repository.
    pub fn new(store: Arc<dyn ProfileRepository>, config: &AuthConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.credential_cache_max_capacity)
            .time_to_live(config.credential_cache_ttl())
            .build();

        Self { store, cache }
    }

    /// Register a new profile.
    pub async fn create(&self, request: &CreateProfileRequest) -> AppResult<()> {
        if request.nick.is_empty() {
            return Err(AppError::from_kind(ErrorKind::NickRequired));
        }
        if request.password.is_empty() {
            return Err(AppError::from_kind(ErrorKind::PasswordRequired));
        }

        let password_hash = password::hash(&request.password)?;
        let profile = StoredProfile {
            nick: request.nick.clone(),
            password_hash,
            description: request.description.clone(),
        };

        self.store.insert(&profile).await?;
        debug!(nick = %request.nick, "profile created");
        Ok(())
    }

    /// Update the public part of a profile and drop its cache entry.
    pub async fn edit(&self, nick: &str, request: &EditProfileRequest) -> AppResult<()> {
        self.store
            .update_public(&PublicProfile {
                nick: nick.to_string(),
                description: request.description.clone(),
            })
            .await?;
        self.cache.invalidate(nick).await;
        debug!(nick = %nick, "profile updated");
        Ok(())
    }

    /// Fetch a profile through the cache, falling back to the store.
    async fn profile_data(&self, nick: &str) -> AppResult<StoredProfile> {
        if let Some(profile) = self.cache.get(nick).await {
            return Ok(profile);
        }
        let profile = self.store.select(nick).await?;
        self.cache.insert(nick.to_string(), profile.clone()).await;
        Ok(profile)
    }
}

#[async_trait]
impl CredentialVerifier for ProfileService {
    async fn is_auth_valid(&self, nick: &str, password: &str) -> bool {
        if nick.is_empty() || password.is_empty() {
            return false;
        }
        let profile = match self.profile_data(nick).await {
            Ok(profile) => profile,
            Err(_) => return false,
        };
        password::verify(password, &profile.password_hash)
    }

    async fn profile_of(&self, nick: &str) -> AppResult<PublicProfile> {
        let profile = self.profile_data(nick).await?;
        Ok(PublicProfile {
            nick: profile.nick,
            description: profile.description,
        })
    }
}
