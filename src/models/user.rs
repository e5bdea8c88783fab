use crate::error::{AppError, FieldErrors};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Payload for `POST /api/register` and the HTML registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    /// Field checks that do not need the database; username/email
    /// uniqueness is checked at the handler and reported on the same map.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();

        let username_chars = self.username.chars().count();
        if username_chars < 3 {
            errors.add("username", "Username must be at least 3 characters");
        } else if username_chars > 50 {
            errors.add("username", "Ensure this value has at most 50 characters");
        }

        if !self.email.contains('@') {
            errors.add("email", "Enter a valid email address");
        }

        if self.password.len() < 8 {
            errors.add("password", "Password must be at least 8 characters");
        }

        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}
