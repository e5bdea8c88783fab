//! Profile read/update for the JSON API.

use crate::{
    db,
    error::{AppError, FieldErrors},
    middleware::auth::AuthUser,
    models::*,
};
use axum::{extract::State, Json};

use super::skills::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = db::profiles::get_profile(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    req.validate()?;

    // Only the caller's own skills can be pinned to their profile.
    let mut errors = FieldErrors::new();
    for skill_id in &req.skill_ids {
        if db::skills::get_skill(&state.pool, &auth_user.user_id, skill_id)
            .await?
            .is_none()
        {
            errors.add("skill_ids", "Select valid skills");
            break;
        }
    }
    errors.into_result()?;

    let profile = db::profiles::update_profile(
        &state.pool,
        &auth_user.user_id,
        req.bio.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        req.profile_picture.as_deref(),
        req.address.as_ref(),
        &req.skill_ids,
    )
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(Json(profile))
}
