//! In-memory profile repository.
//!
//! The persistent profile store is an external collaborator; this
//! implementation backs single-process deployments and tests.

use async_trait::async_trait;
use dashmap::DashMap;

use chathub_core::error::{AppError, ErrorKind};
use chathub_core::result::AppResult;
use chathub_core::traits::ProfileRepository;
use chathub_core::types::{PublicProfile, StoredProfile};

/// Profile repository keeping all records in process memory.
#[derive(Debug, Default)]
pub struct MemoryProfileRepository {
    profiles: DashMap<String, StoredProfile>,
}

impl MemoryProfileRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn insert(&self, profile: &StoredProfile) -> AppResult<()> {
        match self.profiles.entry(profile.nick.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(AppError::from_kind(ErrorKind::NickAlreadyUsed))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(profile.clone());
                Ok(())
            }
        }
    }

    async fn update_public(&self, profile: &PublicProfile) -> AppResult<()> {
        let mut entry = self
            .profiles
            .get_mut(&profile.nick)
            .ok_or_else(|| AppError::from_kind(ErrorKind::UserNotFound))?;
        entry.description = profile.description.clone();
        Ok(())
    }

    async fn select(&self, nick: &str) -> AppResult<StoredProfile> {
        self.profiles
            .get(nick)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::from_kind(ErrorKind::UserNotFound))
    }
}
