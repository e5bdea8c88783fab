//! HTTP handlers: JSON API modules plus the server-rendered pages.
//!
//! - `auth`: registration, token issuing/refresh, logout, current user
//! - `skills` / `sessions` / `profile`: owner-scoped CRUD
//! - `dashboard`: statistics aggregate
//! - `pages`: the web interface over the same data
//! - `health`: liveness probe

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod pages;
pub mod profile;
pub mod sessions;
pub mod skills;

pub use dashboard::*;
pub use health::*;
pub use profile::*;
pub use sessions::*;
pub use skills::*;
