//! Application error type and its HTTP mapping.
//!
//! Handlers return `Result<T, AppError>`; Axum turns the error into a JSON
//! response via `IntoResponse`. Validation failures carry a per-field message
//! map so forms and API clients can surface errors inline.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

/// Per-field validation messages, keyed by field name.
///
/// Ordered map so error output is stable across requests.
#[derive(Debug, Default, Clone, Serialize)]
pub struct FieldErrors(pub BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        // First message per field wins, like a form that stops at the
        // first failing rule.
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(|s| s.as_str())
    }

    /// Finish a validation pass: `Ok` if no messages were collected.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or not owned by the caller. Ownership failures deliberately
    /// collapse into this variant so record existence never leaks.
    #[error("Resource not found")]
    NotFound,

    /// One or more fields failed validation (HTTP 400).
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match self {
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, "not_found", self.to_string(), None)
            }
            AppError::Validation(ref errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "One or more fields are invalid".to_string(),
                Some(errors.clone()),
            ),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None)
            }
            AppError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone(), None)
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "An IO error occurred".to_string(),
                    None,
                )
            }
        };

        let body = match fields {
            Some(fields) => Json(json!({
                "error": {
                    "code": code,
                    "message": message,
                    "fields": fields
                }
            })),
            None => Json(json!({
                "error": {
                    "code": code,
                    "message": message
                }
            })),
        };

        (status, body).into_response()
    }
}
