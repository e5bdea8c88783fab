//! Skill CRUD for the JSON API. All operations are scoped to the
//! authenticated caller; a skill someone else owns is a 404.

use crate::{db, error::AppError, middleware::auth::AuthUser, models::*};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

/// Application shared state, injected into every handler via `State`.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt_secret: String,
}

pub async fn list_skills(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let skills = db::skills::list_skills(&state.pool, &auth_user.user_id).await?;
    Ok(Json(json!({ "skills": skills })))
}

pub async fn get_skill(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Skill>, AppError> {
    let skill = db::skills::get_skill(&state.pool, &auth_user.user_id, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(skill))
}

pub async fn create_skill(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<SkillRequest>,
) -> Result<(StatusCode, Json<Skill>), AppError> {
    req.validate()?;

    // Owner comes from the verified token, never from the payload.
    let id = uuid::Uuid::now_v7().to_string();
    let skill = db::skills::create_skill(
        &state.pool,
        &id,
        &auth_user.user_id,
        req.name.trim(),
        req.description.trim(),
        req.category_slug(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(skill)))
}

pub async fn update_skill(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<SkillRequest>,
) -> Result<Json<Skill>, AppError> {
    req.validate()?;

    let skill = db::skills::update_skill(
        &state.pool,
        &auth_user.user_id,
        &id,
        req.name.trim(),
        req.description.trim(),
        req.category_slug(),
    )
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(Json(skill))
}

pub async fn delete_skill(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let deleted = db::skills::delete_skill(&state.pool, &auth_user.user_id, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
