//! Dashboard statistics endpoint: the same aggregate the dashboard page
//! renders, as JSON.

use crate::{db, error::AppError, middleware::auth::AuthUser, models::DashboardStats};
use axum::{extract::State, Json};

use super::skills::AppState;

pub async fn dashboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = db::stats::dashboard(&state.pool, &auth_user.user_id).await?;
    Ok(Json(stats))
}
