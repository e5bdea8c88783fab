//! Data access layer: hand-written parameterized SQL, one module per entity.
//!
//! Every skill/session/profile query is scoped by `user_id`, so ownership
//! checks and lookups are a single statement and a missing row is
//! indistinguishable from a row owned by someone else.

pub mod profiles;
pub mod sessions;
pub mod skills;
pub mod stats;
pub mod users;

#[cfg(test)]
pub(crate) mod testing {
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use sqlx::SqlitePool;
    use std::str::FromStr;

    /// Fresh in-memory database with the real migrations applied.
    ///
    /// A single connection keeps every query on the same `:memory:` store.
    pub async fn pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    pub async fn seed_user(pool: &SqlitePool, username: &str) -> String {
        let id = uuid::Uuid::now_v7().to_string();
        let email = format!("{username}@example.com");
        super::users::create_user(pool, &id, username, &email, "not-a-real-hash")
            .await
            .unwrap();
        id
    }

    pub async fn seed_skill(
        pool: &SqlitePool,
        user_id: &str,
        name: &str,
        category: Option<&str>,
    ) -> String {
        let id = uuid::Uuid::now_v7().to_string();
        super::skills::create_skill(pool, &id, user_id, name, "seeded", category)
            .await
            .unwrap();
        id
    }

    pub async fn seed_session(
        pool: &SqlitePool,
        user_id: &str,
        skill_id: &str,
        date: &str,
        minutes: i64,
    ) -> String {
        let id = uuid::Uuid::now_v7().to_string();
        super::sessions::create_session(pool, &id, user_id, skill_id, date, minutes, None)
            .await
            .unwrap();
        id
    }
}
