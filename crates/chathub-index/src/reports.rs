//! Per-user activity aggregation.
//!
//! Groups one author's messages per channel over a bounded range, with an
//! optional date histogram. Histogram buckets are zero-filled across the
//! requested bounds so gaps are visible to the consumer.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use chathub_core::error::AppError;
use chathub_core::result::AppResult;
use chathub_core::types::reports::{
    ChannelActivity, DistributionEntry, GroupBy, UserActivityReport, UserActivityReportOptions,
    REPORT_DATE_FORMAT, REPORT_DATE_FORMAT_DAYS,
};
use chathub_core::types::MessageEvent;

/// Build an activity report from the raw message log.
pub(crate) fn build_report(
    messages: &[MessageEvent],
    opts: &UserActivityReportOptions,
    max_channels: usize,
    max_days: i64,
) -> AppResult<UserActivityReport> {
    if opts.from > opts.to {
        return Err(AppError::validation(
            "invalid range. `from` must be before `to`",
        ));
    }
    if opts.to - opts.from > Duration::days(max_days) {
        return Err(AppError::validation("max report size exceeded"));
    }

    let from_ts = opts.from.timestamp();
    let to_ts = opts.to.timestamp();

    // Channel → timestamps of the author's messages within the range.
    let mut per_channel: HashMap<&str, Vec<i64>> = HashMap::new();
    for message in messages {
        if message.author == opts.author
            && message.timestamp >= from_ts
            && message.timestamp <= to_ts
        {
            per_channel
                .entry(message.channel.as_str())
                .or_default()
                .push(message.timestamp);
        }
    }

    // Keep the busiest channels when over the cap.
    let mut channels: Vec<(&str, Vec<i64>)> = per_channel.into_iter().collect();
    channels.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));
    channels.truncate(max_channels);

    let mut channel_activity = HashMap::new();
    for (channel, timestamps) in channels {
        let distribution = match opts.group_by {
            Some(group_by) => distribute(&timestamps, group_by, from_ts, to_ts),
            None => Vec::new(),
        };
        channel_activity.insert(
            channel.to_string(),
            ChannelActivity {
                total_messages: timestamps.len(),
                message_count_distribution: distribution,
            },
        );
    }

    Ok(UserActivityReport {
        channel_activity,
        from: opts.from,
        to: opts.to,
    })
}

/// Bucket timestamps into a zero-filled histogram across `[from, to]`.
fn distribute(timestamps: &[i64], group_by: GroupBy, from_ts: i64, to_ts: i64) -> Vec<DistributionEntry> {
    let bucket_secs = match group_by {
        GroupBy::Day => 86_400,
        GroupBy::Hour => 3_600,
        GroupBy::Minute => 60,
    };

    let first_bucket = from_ts - from_ts.rem_euclid(bucket_secs);
    let mut buckets: Vec<DistributionEntry> = Vec::new();
    let mut start = first_bucket;
    while start <= to_ts {
        let count = timestamps
            .iter()
            .filter(|&&ts| ts >= start && ts < start + bucket_secs)
            .count();
        buckets.push(DistributionEntry {
            period_start: format_bucket(start, group_by),
            messages_in_period: count,
        });
        start += bucket_secs;
    }
    buckets
}

fn format_bucket(start_ts: i64, group_by: GroupBy) -> String {
    let start: DateTime<Utc> = DateTime::from_timestamp(start_ts, 0).unwrap_or_else(Utc::now);
    match group_by {
        GroupBy::Day => start.format(REPORT_DATE_FORMAT_DAYS).to_string(),
        GroupBy::Hour | GroupBy::Minute => start.format(REPORT_DATE_FORMAT).to_string(),
    }
}
