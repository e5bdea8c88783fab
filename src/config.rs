//! Application configuration read from environment variables.
//!
//! `DATABASE_URL` and `JWT_SECRET` are required; everything else has a
//! sensible default so a bare `.env` is enough for local development.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database URL (e.g. "sqlite:data/skilltrack.db").
    pub database_url: String,
    /// Secret used to sign and verify JWTs.
    pub jwt_secret: String,
    /// Directory that holds uploaded profile pictures.
    pub uploads_path: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            uploads_path: env::var("UPLOADS_PATH")
                .unwrap_or_else(|_| "data/uploads".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        })
    }
}
