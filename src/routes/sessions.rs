//! Study session CRUD for the JSON API.
//!
//! Beyond the field checks, create and update verify that the referenced
//! skill belongs to the caller — the selectable set is the caller's own
//! skills, so a foreign skill id is reported as a `skill_id` field error.

use crate::{db, error::AppError, middleware::auth::AuthUser, models::*};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use super::skills::AppState;

pub async fn list_sessions(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let sessions = db::sessions::list_sessions(&state.pool, &auth_user.user_id).await?;
    Ok(Json(json!({ "sessions": sessions })))
}

pub async fn get_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<StudySession>, AppError> {
    let session = db::sessions::get_session(&state.pool, &auth_user.user_id, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(session))
}

pub async fn create_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<SessionRequest>,
) -> Result<(StatusCode, Json<StudySession>), AppError> {
    validate_session_request(&state, &auth_user.user_id, &req).await?;

    let id = uuid::Uuid::now_v7().to_string();
    let session = db::sessions::create_session(
        &state.pool,
        &id,
        &auth_user.user_id,
        &req.skill_id,
        &req.date,
        req.duration_minutes,
        req.notes_trimmed(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn update_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<StudySession>, AppError> {
    validate_session_request(&state, &auth_user.user_id, &req).await?;

    let session = db::sessions::update_session(
        &state.pool,
        &auth_user.user_id,
        &id,
        &req.skill_id,
        &req.date,
        req.duration_minutes,
        req.notes_trimmed(),
    )
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(Json(session))
}

pub async fn delete_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let deleted = db::sessions::delete_session(&state.pool, &auth_user.user_id, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Field checks plus the store-backed rule that `skill_id` must name one of
/// the caller's own skills.
pub async fn validate_session_request(
    state: &AppState,
    user_id: &str,
    req: &SessionRequest,
) -> Result<(), AppError> {
    req.validate()?;

    if db::skills::get_skill(&state.pool, user_id, &req.skill_id)
        .await?
        .is_none()
    {
        let mut errors = crate::error::FieldErrors::new();
        errors.add("skill_id", "Select a valid skill");
        return errors.into_result();
    }

    Ok(())
}
