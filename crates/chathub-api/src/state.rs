//! Application state shared across all handlers.

use std::sync::Arc;

use chathub_auth::profile::memory::MemoryProfileRepository;
use chathub_auth::profile::service::ProfileService;
use chathub_core::config::AppConfig;
use chathub_core::traits::MessageIndex;
use chathub_index::store::MessageStore;
use chathub_realtime::engine::ChatEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// The chat engine (registry + pool + session supervision).
    pub engine: Arc<ChatEngine>,
    /// Profile service (registration, edits, credential checks).
    pub profiles: Arc<ProfileService>,
    /// Message index (history searches, activity reports).
    pub index: Arc<dyn MessageIndex>,
}

impl AppState {
    /// Assemble the full application state from configuration.
    pub fn new(config: AppConfig) -> Self {
        let profiles = Arc::new(ProfileService::new(
            Arc::new(MemoryProfileRepository::new()),
            &config.auth,
        ));
        let index: Arc<dyn MessageIndex> = Arc::new(MessageStore::new(&config.index));
        let engine = Arc::new(ChatEngine::new(
            config.session.clone(),
            index.clone(),
            profiles.clone(),
        ));

        Self {
            config: Arc::new(config),
            engine,
            profiles,
            index,
        }
    }
}
