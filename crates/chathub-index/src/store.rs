//! In-memory searchable message store.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use chathub_core::config::IndexConfig;
use chathub_core::result::AppResult;
use chathub_core::traits::MessageIndex;
use chathub_core::types::reports::{UserActivityReport, UserActivityReportOptions};
use chathub_core::types::MessageEvent;

use crate::reports;

/// Message store keeping the full index in process memory.
///
/// Search semantics follow phrase-prefix matching: a message matches when
/// the sought phrase appears in its text starting at a word boundary, with
/// the last term allowed to be a prefix. Results are returned newest first.
#[derive(Debug)]
pub struct MessageStore {
    /// Index name this store answers for.
    index_name: String,
    /// All indexed messages in arrival order.
    messages: Arc<RwLock<Vec<MessageEvent>>>,
    /// Report caps.
    max_channels_in_report: usize,
    max_report_size_days: i64,
}

impl MessageStore {
    /// Creates an empty store from configuration.
    pub fn new(config: &IndexConfig) -> Self {
        Self {
            index_name: config.messages_index_name.clone(),
            messages: Arc::new(RwLock::new(Vec::new())),
            max_channels_in_report: config.max_channels_in_report,
            max_report_size_days: config.max_report_size_days,
        }
    }

    /// The index name this store answers for.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Number of indexed messages.
    pub fn len(&self) -> usize {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no messages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MessageIndex for MessageStore {
    async fn index(&self, message: &MessageEvent) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        self.messages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        debug!(index = %self.index_name, channel = %message.channel, doc_id = %id, "message indexed");
        Ok(id)
    }

    async fn find(&self, channel: &str, phrase: Option<&str>) -> AppResult<Vec<MessageEvent>> {
        let messages = self.messages.read().unwrap_or_else(PoisonError::into_inner);
        let mut results: Vec<MessageEvent> = messages
            .iter()
            .filter(|m| m.channel == channel)
            .filter(|m| match phrase {
                Some(phrase) if !phrase.is_empty() => matches_phrase(&m.text, phrase),
                _ => true,
            })
            .cloned()
            .collect();
        results.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(results)
    }

    async fn user_activity(
        &self,
        opts: &UserActivityReportOptions,
    ) -> AppResult<UserActivityReport> {
        let messages = self.messages.read().unwrap_or_else(PoisonError::into_inner);
        reports::build_report(
            &messages,
            opts,
            self.max_channels_in_report,
            self.max_report_size_days,
        )
    }
}

/// Phrase-prefix match: the sought phrase must occur in the text starting
/// at a word boundary. Case-insensitive.
fn matches_phrase(text: &str, phrase: &str) -> bool {
    let text = text.to_lowercase();
    let phrase = phrase.to_lowercase();
    let mut at_boundary = true;
    for (i, c) in text.char_indices() {
        if at_boundary && text[i..].starts_with(&phrase) {
            return true;
        }
        at_boundary = c.is_whitespace();
    }
    false
}
