//! User activity report types.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Date format accepted by the reports endpoint and used for hour/minute
/// bucket labels.
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Date format used for day bucket labels.
pub const REPORT_DATE_FORMAT_DAYS: &str = "%Y-%m-%d";

/// Histogram granularity for activity reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// One bucket per calendar day.
    Day,
    /// One bucket per hour.
    Hour,
    /// One bucket per minute.
    Minute,
}

impl FromStr for GroupBy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "hour" => Ok(Self::Hour),
            "minute" => Ok(Self::Minute),
            _ => Err(AppError::validation(
                "invalid `group_by` value. Must be one of: day, hour, minute",
            )),
        }
    }
}

/// Options for a user activity report query.
#[derive(Debug, Clone)]
pub struct UserActivityReportOptions {
    /// Author whose messages are aggregated.
    pub author: String,
    /// Optional histogram granularity; `None` yields totals only.
    pub group_by: Option<GroupBy>,
    /// Start of the reported range (inclusive).
    pub from: DateTime<Utc>,
    /// End of the reported range (inclusive).
    pub to: DateTime<Utc>,
}

/// One histogram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionEntry {
    /// Bucket start, formatted per the requested granularity.
    pub period_start: String,
    /// Number of messages in the bucket.
    pub messages_in_period: usize,
}

/// Aggregated activity in a single channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelActivity {
    /// Total messages by the author in the range.
    pub total_messages: usize,
    /// Histogram over the range, present when `group_by` was requested.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub message_count_distribution: Vec<DistributionEntry>,
}

/// Per-channel activity report for one author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserActivityReport {
    /// Channel name → activity.
    pub channel_activity: HashMap<String, ChannelActivity>,
    /// Start of the reported range.
    pub from: DateTime<Utc>,
    /// End of the reported range.
    pub to: DateTime<Utc>,
}
