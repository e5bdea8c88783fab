use crate::{
    db::{profiles as db_profiles, users as db_users},
    error::{AppError, FieldErrors},
    middleware::auth::{create_access_token, create_refresh_token, hash_token, verify_token, AuthUser},
    models::user::*,
    routes::skills::AppState,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let user = create_account(&state, &req).await?;
    let response = issue_tokens(&state, user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Validate a registration and create the user plus their profile.
/// Shared by the API register endpoint and the registration page.
pub async fn create_account(state: &AppState, req: &RegisterRequest) -> Result<User, AppError> {
    req.validate()?;

    // Uniqueness conflicts surface as field errors, like any other
    // validation failure.
    let mut errors = FieldErrors::new();
    if db_users::find_by_username(&state.pool, &req.username).await?.is_some() {
        errors.add("username", "A user with that username already exists");
    }
    if db_users::find_by_email(&state.pool, &req.email).await?.is_some() {
        errors.add("email", "A user with that email already exists");
    }
    errors.into_result()?;

    let password_hash = hash_password(&req.password)?;

    let user_id = uuid::Uuid::now_v7().to_string();
    let user =
        db_users::create_user(&state.pool, &user_id, &req.username, &req.email, &password_hash)
            .await
            .map_err(map_unique_violation)?;

    // Every user gets a profile up front, with the default picture.
    let profile_id = uuid::Uuid::now_v7().to_string();
    db_profiles::create_profile(&state.pool, &profile_id, &user.id).await?;

    Ok(user)
}

/// Backstop for the uniqueness pre-checks: a concurrent registration can
/// slip past the lookups, and the UNIQUE violation must still come back as
/// a field error rather than a generic database error.
fn map_unique_violation(err: AppError) -> AppError {
    if let AppError::Database(sqlx::Error::Database(ref db_err)) = err {
        if db_err.is_unique_violation() {
            let mut errors = FieldErrors::new();
            if db_err.message().contains("users.username") {
                errors.add("username", "A user with that username already exists");
            } else if db_err.message().contains("users.email") {
                errors.add("email", "A user with that email already exists");
            }
            if !errors.is_empty() {
                return AppError::Validation(errors);
            }
        }
    }
    err
}

/// `POST /api/token` — exchange username and password for a token pair.
pub async fn obtain_token(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = authenticate(&state, &req.username, &req.password).await?;
    let response = issue_tokens(&state, user).await?;
    Ok(Json(response))
}

/// `POST /api/token/refresh` — rotate a refresh token for a new pair.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let _claims = verify_token(&req.refresh_token, &state.jwt_secret)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    // The token must also still be on record; logout revokes it there.
    let token_hash = hash_token(&req.refresh_token);
    let (_token_id, user_id, expires_at) = db_users::find_refresh_token(&state.pool, &token_hash)
        .await?
        .ok_or(AppError::Unauthorized("Refresh token not found or revoked".to_string()))?;

    let expires = chrono::NaiveDateTime::parse_from_str(&expires_at, "%Y-%m-%dT%H:%M:%S%.3fZ")
        .map_err(|e| AppError::Internal(format!("Date parse error: {}", e)))?;
    if expires.and_utc() < Utc::now() {
        db_users::delete_refresh_token(&state.pool, &token_hash).await?;
        return Err(AppError::Unauthorized("Refresh token expired".to_string()));
    }

    let user = db_users::find_by_id(&state.pool, &user_id)
        .await?
        .ok_or(AppError::Unauthorized("User not found".to_string()))?;

    // Rotation: the old token is spent.
    db_users::delete_refresh_token(&state.pool, &token_hash).await?;

    let response = issue_tokens(&state, user).await?;
    Ok(Json(response))
}

pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    db_users::delete_user_refresh_tokens(&state.pool, &auth_user.user_id).await?;

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(user.into()))
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Look a user up by username and verify their password. Both failure modes
/// return the same message.
pub async fn authenticate(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = db_users::find_by_username(&state.pool, username)
        .await?
        .ok_or(AppError::Unauthorized("Invalid username or password".to_string()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized("Invalid username or password".to_string()))?;

    Ok(user)
}

/// Mint an access + refresh pair and put the refresh token hash on record.
pub async fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let access_token = create_access_token(&user.id, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;
    let refresh_token = create_refresh_token(&user.id, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    let token_id = uuid::Uuid::now_v7().to_string();
    let token_hash = hash_token(&refresh_token);
    let expires_at = (Utc::now() + Duration::days(7))
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();

    db_users::store_refresh_token(&state.pool, &token_id, &user.id, &token_hash, &expires_at)
        .await?;

    Ok(AuthResponse {
        user: user.into(),
        access_token,
        refresh_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;

    async fn test_state() -> AppState {
        AppState {
            pool: testing::pool().await,
            jwt_secret: "test-secret".to_string(),
        }
    }

    fn registration(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[tokio::test]
    async fn registration_creates_one_user_and_one_profile() {
        let state = test_state().await;
        let user = create_account(&state, &registration("alice", "alice@example.com"))
            .await
            .unwrap();

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&state.pool)
            .await
            .unwrap();
        assert_eq!(users, 1);

        let profiles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_profiles")
            .fetch_one(&state.pool)
            .await
            .unwrap();
        assert_eq!(profiles, 1);

        let profile = crate::db::profiles::get_profile(&state.pool, &user.id)
            .await
            .unwrap();
        assert!(profile.is_some());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_field_error() {
        let state = test_state().await;
        create_account(&state, &registration("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = create_account(&state, &registration("alice", "other@example.com")).await;
        match result {
            Err(AppError::Validation(fields)) => {
                assert!(fields.get("username").is_some());
                assert!(fields.get("email").is_none());
            }
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_field_error() {
        let state = test_state().await;
        create_account(&state, &registration("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = create_account(&state, &registration("bob", "alice@example.com")).await;
        match result {
            Err(AppError::Validation(fields)) => {
                assert!(fields.get("email").is_some());
                assert!(fields.get("username").is_none());
            }
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn unique_violation_maps_back_to_a_field_error() {
        // A registration racing past the pre-checks hits the UNIQUE
        // constraint instead; that error must map to the same field error.
        let pool = testing::pool().await;
        testing::seed_user(&pool, "alice").await;

        let err = db_users::create_user(
            &pool,
            &uuid::Uuid::now_v7().to_string(),
            "alice",
            "other@example.com",
            "hash",
        )
        .await
        .unwrap_err();

        match map_unique_violation(err) {
            AppError::Validation(fields) => {
                assert!(fields.get("username").is_some());
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
