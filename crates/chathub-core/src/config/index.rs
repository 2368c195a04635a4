//! Message index configuration.

use serde::{Deserialize, Serialize};

/// Message index and reporting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Name of the index that stores broadcast messages.
    #[serde(default = "default_index_name")]
    pub messages_index_name: String,
    /// Maximum number of channels returned in a user activity report.
    #[serde(default = "default_max_channels")]
    pub max_channels_in_report: usize,
    /// Maximum report range in days.
    #[serde(default = "default_max_report_days")]
    pub max_report_size_days: i64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            messages_index_name: default_index_name(),
            max_channels_in_report: default_max_channels(),
            max_report_size_days: default_max_report_days(),
        }
    }
}

fn default_index_name() -> String {
    "messages".to_string()
}

fn default_max_channels() -> usize {
    50
}

fn default_max_report_days() -> i64 {
    30
}
