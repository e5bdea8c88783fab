//! SkillTrack server entry point: load config, connect SQLite, run
//! migrations, and serve the JSON API next to the server-rendered pages.

mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use config::Config;
use routes::{pages, skills::AppState, *};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skilltrack=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting SkillTrack server on {}:{}", config.host, config.port);

    // Foreign keys must be on for the skill -> session cascade.
    let connect_options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Profile pictures live under the uploads directory.
    let uploads_path = Path::new(&config.uploads_path);
    if !uploads_path.exists() {
        tokio::fs::create_dir_all(uploads_path).await?;
        tracing::info!("Created uploads directory: {}", config.uploads_path);
    }

    let state = AppState {
        pool: pool.clone(),
        jwt_secret: config.jwt_secret.clone(),
    };

    let api_routes = Router::new()
        // Credential issuance
        .route("/register", post(routes::auth::register))
        .route("/token", post(routes::auth::obtain_token))
        .route("/token/refresh", post(routes::auth::refresh))
        .route("/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me))
        // Owner-scoped CRUD
        .route("/skills", get(list_skills).post(create_skill))
        .route(
            "/skills/{id}",
            get(get_skill).put(update_skill).delete(delete_skill),
        )
        .route("/sessions", get(list_sessions).post(create_session))
        .route(
            "/sessions/{id}",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route("/profile", get(get_profile).put(update_profile))
        // Statistics
        .route("/dashboard", get(dashboard))
        .route("/health", get(health_check))
        .with_state(state.clone());

    let page_routes = Router::new()
        .route("/", get(pages::home))
        .route("/login", get(pages::login_page).post(pages::login_submit))
        .route("/register", get(pages::register_page).post(pages::register_submit))
        .route("/logout", get(pages::logout))
        .route("/dashboard", get(pages::dashboard_page))
        .route("/profile", get(pages::profile_page))
        .route("/skills", get(pages::skills_page))
        .route("/skills/new", get(pages::skill_new_page).post(pages::skill_create))
        .route(
            "/skills/{id}/edit",
            get(pages::skill_edit_page).post(pages::skill_update),
        )
        .route("/skills/{id}/delete", post(pages::skill_delete))
        .route("/sessions", get(pages::sessions_page))
        .route("/sessions/new", get(pages::session_new_page).post(pages::session_create))
        .route(
            "/sessions/{id}/edit",
            get(pages::session_edit_page).post(pages::session_update),
        )
        .route("/sessions/{id}/delete", post(pages::session_delete))
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .nest_service("/uploads", ServeDir::new(&config.uploads_path))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
