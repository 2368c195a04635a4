//! Profile endpoints: register, edit, public lookup.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use chathub_core::result::AppResult;
use chathub_core::traits::CredentialVerifier;
use chathub_core::types::response::EmptyResponse;
use chathub_core::types::{CreateProfileRequest, EditProfileRequest, PublicProfile};

use crate::extractors::auth::BasicAuthUser;
use crate::state::AppState;

use super::with_deadline;

/// POST /api/profiles — register a new profile.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CreateProfileRequest>,
) -> AppResult<(StatusCode, Json<EmptyResponse>)> {
    with_deadline(
        state.config.session.external_call_deadline(),
        state.profiles.create(&request),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(EmptyResponse::default())))
}

/// PUT /api/profiles/me — edit the authenticated user's profile.
pub async fn edit(
    State(state): State<AppState>,
    user: BasicAuthUser,
    Json(request): Json<EditProfileRequest>,
) -> AppResult<Json<EmptyResponse>> {
    with_deadline(
        state.config.session.external_call_deadline(),
        state.profiles.edit(&user.nick, &request),
    )
    .await?;
    Ok(Json(EmptyResponse::default()))
}

/// GET /api/profiles/{nick} — public profile lookup, no authorization.
pub async fn get(
    State(state): State<AppState>,
    Path(nick): Path<String>,
) -> AppResult<Json<PublicProfile>> {
    let profile = with_deadline(
        state.config.session.external_call_deadline(),
        state.profiles.profile_of(&nick),
    )
    .await?;
    Ok(Json(profile))
}
