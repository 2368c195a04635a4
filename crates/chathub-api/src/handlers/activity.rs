//! User activity report endpoint.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use chathub_core::error::AppError;
use chathub_core::result::AppResult;
use chathub_core::traits::MessageIndex;
use chathub_core::types::reports::{
    GroupBy, UserActivityReport, UserActivityReportOptions, REPORT_DATE_FORMAT,
};

use crate::extractors::auth::BasicAuthUser;
use crate::state::AppState;

use super::with_deadline;

/// Query parameters for the activity report endpoint.
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    /// Range start, `YYYY-MM-DD HH:mm`.
    pub from: Option<String>,
    /// Range end, `YYYY-MM-DD HH:mm`.
    pub to: Option<String>,
    /// Optional histogram granularity: day, hour or minute.
    pub group_by: Option<String>,
}

/// GET /api/reports/activity — aggregate the authenticated user's messages.
pub async fn get(
    State(state): State<AppState>,
    user: BasicAuthUser,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<UserActivityReport>> {
    let opts = parse_options(&user.nick, &query)?;
    let report = with_deadline(
        state.config.session.external_call_deadline(),
        state.index.user_activity(&opts),
    )
    .await?;
    Ok(Json(report))
}

fn parse_options(author: &str, query: &ActivityQuery) -> AppResult<UserActivityReportOptions> {
    let from = query
        .from
        .as_deref()
        .ok_or_else(|| AppError::validation("`from` is required"))?;
    let to = query
        .to
        .as_deref()
        .ok_or_else(|| AppError::validation("`to` is required"))?;

    let group_by = match query.group_by.as_deref() {
        Some(value) => Some(value.parse::<GroupBy>()?),
        None => None,
    };

    Ok(UserActivityReportOptions {
        author: author.to_string(),
        group_by,
        from: parse_date(from)?,
        to: parse_date(to)?,
    })
}

fn parse_date(value: &str) -> AppResult<chrono::DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value, REPORT_DATE_FORMAT)
        .map_err(|_| AppError::validation("invalid date format. Must be: `YYYY-MM-DD HH:mm`"))?;
    Ok(Utc.from_utc_datetime(&naive))
}
