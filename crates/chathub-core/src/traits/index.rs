//! Message index trait — the search-capable message sink.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::message::MessageEvent;
use crate::types::reports::{UserActivityReport, UserActivityReportOptions};

/// Trait for the store that persists every broadcast message and later
/// answers history and aggregate queries.
///
/// `index` is called inside publish, before any broadcast; a failure here
/// suppresses the broadcast entirely. Ordering and filtering of `find`
/// results is the index's responsibility; callers trust the returned
/// sequence.
#[async_trait]
pub trait MessageIndex: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a message, returning its document id.
    async fn index(&self, message: &MessageEvent) -> AppResult<String>;

    /// Return the channel's messages, newest first, optionally narrowed to
    /// those matching a sought phrase.
    async fn find(&self, channel: &str, phrase: Option<&str>) -> AppResult<Vec<MessageEvent>>;

    /// Aggregate one author's messages into a per-channel activity report.
    async fn user_activity(
        &self,
        opts: &UserActivityReportOptions,
    ) -> AppResult<UserActivityReport>;
}
