//! JWT authentication for the API and the server-rendered pages.
//!
//! The API carries an access token in the `Authorization: Bearer` header and
//! is extracted by [`AuthUser`]. Pages carry a longer-lived token in the
//! `session` cookie and are extracted by [`PageUser`], whose rejection is a
//! redirect to `/login` instead of a 401.

use axum::{
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        StatusCode,
    },
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::routes::skills::AppState;

/// Name of the cookie that carries the page-session JWT.
pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: i64,
    pub iat: i64,
}

/// Authenticated API caller, extracted from the Bearer header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let claims = verify_token(token, &state.jwt_secret)?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

/// Authenticated page visitor, extracted from the session cookie.
///
/// Missing or invalid cookie redirects to the login page rather than
/// returning a JSON error.
#[derive(Debug, Clone)]
pub struct PageUser {
    pub user_id: String,
}

impl FromRequestParts<AppState> for PageUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(session_token_from_cookies)
            .ok_or_else(|| Redirect::to("/login"))?;

        let claims =
            verify_token(&token, &state.jwt_secret).map_err(|_| Redirect::to("/login"))?;

        Ok(PageUser {
            user_id: claims.sub,
        })
    }
}

/// User id from a request's Cookie header, if it carries a valid session
/// token. Used by pages that render differently for visitors and users.
pub fn user_from_cookie_header(header: Option<&str>, secret: &str) -> Option<String> {
    let token = header.and_then(session_token_from_cookies)?;
    verify_token(&token, secret).ok().map(|claims| claims.sub)
}

fn session_token_from_cookies(header: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Set-Cookie value that logs a browser session in.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        60 * 60 * 24 * 7
    )
}

/// Set-Cookie value that logs a browser session out.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Authorization token is required",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid authorization token",
            ),
            AuthError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                "expired_token",
                "Authorization token has expired",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

pub fn create_access_token(
    user_id: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    sign_token(user_id, secret, Duration::minutes(15))
}

/// Refresh tokens double as page-session tokens; both live for a week.
pub fn create_refresh_token(
    user_id: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    sign_token(user_id, secret, Duration::days(7))
}

fn sign_token(
    user_id: &str,
    secret: &str,
    lifetime: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// SHA-256 hex digest of a refresh token; only hashes are stored.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
