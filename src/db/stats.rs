//! Dashboard statistics aggregator.
//!
//! All figures are plain SQL aggregates over the caller's sessions,
//! recomputed on every request. Nothing is cached.

use crate::error::AppError;
use crate::models::{CategoryCount, Category, DailyTotal, DashboardStats, StudySession};
use sqlx::SqlitePool;

pub async fn dashboard(pool: &SqlitePool, user_id: &str) -> Result<DashboardStats, AppError> {
    let (total_sessions, total_minutes): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COALESCE(SUM(duration_minutes), 0)
        FROM study_sessions
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    // AVG over zero rows is NULL; the dashboard shows 0 then.
    let average_minutes: Option<f64> =
        sqlx::query_scalar("SELECT AVG(duration_minutes) FROM study_sessions WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    let last_session = sqlx::query_as::<_, StudySession>(
        r#"
        SELECT s.id, s.user_id, s.skill_id, s.date, s.duration_minutes, s.notes,
               s.created_at, sk.name AS skill_name
        FROM study_sessions s
        JOIN skills sk ON sk.id = s.skill_id
        WHERE s.user_id = ?
        ORDER BY s.date DESC, s.created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    // Top 3 categories by session count; ties broken by slug so the order
    // is stable across requests. NULL categories group together and are
    // labelled "Uncategorized".
    let category_rows: Vec<(Option<String>, i64)> = sqlx::query_as(
        r#"
        SELECT sk.category, COUNT(*) AS session_count
        FROM study_sessions s
        JOIN skills sk ON sk.id = s.skill_id
        WHERE s.user_id = ?
        GROUP BY sk.category
        ORDER BY session_count DESC, sk.category IS NULL, sk.category
        LIMIT 3
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let top_categories = category_rows
        .into_iter()
        .map(|(slug, sessions)| CategoryCount {
            category: Category::label_for(slug.as_deref()).to_string(),
            sessions,
        })
        .collect();

    let daily_rows: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT date, SUM(duration_minutes)
        FROM study_sessions
        WHERE user_id = ?
        GROUP BY date
        ORDER BY date ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let daily_minutes = daily_rows
        .into_iter()
        .map(|(date, minutes)| DailyTotal {
            date,
            minutes: round_one_decimal(minutes as f64),
        })
        .collect();

    Ok(DashboardStats {
        total_sessions,
        total_minutes,
        average_minutes: average_minutes.unwrap_or(0.0),
        last_session,
        top_categories,
        daily_minutes,
    })
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;

    #[tokio::test]
    async fn empty_dashboard_is_all_zeroes() {
        let pool = testing::pool().await;
        let alice = testing::seed_user(&pool, "alice").await;

        let stats = dashboard(&pool, &alice).await.unwrap();
        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.total_minutes, 0);
        assert_eq!(stats.average_minutes, 0.0);
        assert!(stats.last_session.is_none());
        assert!(stats.top_categories.is_empty());
        assert!(stats.daily_minutes.is_empty());
    }

    #[tokio::test]
    async fn totals_average_and_daily_sum() {
        let pool = testing::pool().await;
        let alice = testing::seed_user(&pool, "alice").await;
        let skill_id = testing::seed_skill(&pool, &alice, "Rust", Some("programming")).await;
        for minutes in [30, 60, 90] {
            testing::seed_session(&pool, &alice, &skill_id, "2026-03-01", minutes).await;
        }

        let stats = dashboard(&pool, &alice).await.unwrap();
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.total_minutes, 180);
        assert_eq!(stats.average_minutes, 60.0);
        assert_eq!(stats.daily_minutes.len(), 1);
        assert_eq!(stats.daily_minutes[0].date, "2026-03-01");
        assert_eq!(stats.daily_minutes[0].minutes, 180.0);
    }

    #[tokio::test]
    async fn last_session_is_most_recent_by_date() {
        let pool = testing::pool().await;
        let alice = testing::seed_user(&pool, "alice").await;
        let rust = testing::seed_skill(&pool, &alice, "Rust", None).await;
        let piano = testing::seed_skill(&pool, &alice, "Piano", None).await;
        testing::seed_session(&pool, &alice, &rust, "2026-03-10", 30).await;
        testing::seed_session(&pool, &alice, &piano, "2026-03-12", 60).await;
        testing::seed_session(&pool, &alice, &rust, "2026-03-11", 90).await;

        let stats = dashboard(&pool, &alice).await.unwrap();
        let last = stats.last_session.unwrap();
        assert_eq!(last.date, "2026-03-12");
        assert_eq!(last.skill_name, "Piano");
    }

    #[tokio::test]
    async fn top_categories_limit_and_uncategorized_label() {
        let pool = testing::pool().await;
        let alice = testing::seed_user(&pool, "alice").await;
        let rust = testing::seed_skill(&pool, &alice, "Rust", Some("programming")).await;
        let piano = testing::seed_skill(&pool, &alice, "Piano", Some("music")).await;
        let chess = testing::seed_skill(&pool, &alice, "Chess", None).await;
        let sketching = testing::seed_skill(&pool, &alice, "Sketching", Some("art")).await;

        // programming: 4, music: 3, (null): 2, art: 1 → art falls off.
        for day in ["2026-03-01", "2026-03-02", "2026-03-03", "2026-03-04"] {
            testing::seed_session(&pool, &alice, &rust, day, 30).await;
        }
        for day in ["2026-03-01", "2026-03-02", "2026-03-03"] {
            testing::seed_session(&pool, &alice, &piano, day, 30).await;
        }
        for day in ["2026-03-01", "2026-03-02"] {
            testing::seed_session(&pool, &alice, &chess, day, 30).await;
        }
        testing::seed_session(&pool, &alice, &sketching, "2026-03-01", 30).await;

        let stats = dashboard(&pool, &alice).await.unwrap();
        let labels: Vec<(&str, i64)> = stats
            .top_categories
            .iter()
            .map(|c| (c.category.as_str(), c.sessions))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("Programming / Coding", 4),
                ("Music & Instruments", 3),
                ("Uncategorized", 2),
            ]
        );
    }

    #[tokio::test]
    async fn daily_breakdown_is_chronological() {
        let pool = testing::pool().await;
        let alice = testing::seed_user(&pool, "alice").await;
        let skill_id = testing::seed_skill(&pool, &alice, "Rust", None).await;
        testing::seed_session(&pool, &alice, &skill_id, "2026-03-05", 45).await;
        testing::seed_session(&pool, &alice, &skill_id, "2026-03-01", 15).await;
        testing::seed_session(&pool, &alice, &skill_id, "2026-03-05", 15).await;

        let stats = dashboard(&pool, &alice).await.unwrap();
        let days: Vec<(&str, f64)> = stats
            .daily_minutes
            .iter()
            .map(|d| (d.date.as_str(), d.minutes))
            .collect();
        assert_eq!(days, vec![("2026-03-01", 15.0), ("2026-03-05", 60.0)]);
    }

    #[tokio::test]
    async fn dashboard_only_counts_the_callers_sessions() {
        let pool = testing::pool().await;
        let alice = testing::seed_user(&pool, "alice").await;
        let bob = testing::seed_user(&pool, "bob").await;
        let alice_skill = testing::seed_skill(&pool, &alice, "Rust", None).await;
        let bob_skill = testing::seed_skill(&pool, &bob, "Piano", None).await;
        testing::seed_session(&pool, &alice, &alice_skill, "2026-03-01", 30).await;
        testing::seed_session(&pool, &bob, &bob_skill, "2026-03-01", 120).await;

        let stats = dashboard(&pool, &alice).await.unwrap();
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.total_minutes, 30);
    }
}
