//! Study session queries. Every read joins the skill name in, matching what
//! session lists and the dashboard display.

use crate::error::AppError;
use crate::models::StudySession;
use sqlx::SqlitePool;

const SELECT_SESSION: &str = r#"
    SELECT s.id, s.user_id, s.skill_id, s.date, s.duration_minutes, s.notes,
           s.created_at, sk.name AS skill_name
    FROM study_sessions s
    JOIN skills sk ON sk.id = s.skill_id
"#;

pub async fn create_session(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    skill_id: &str,
    date: &str,
    duration_minutes: i64,
    notes: Option<&str>,
) -> Result<StudySession, AppError> {
    sqlx::query(
        r#"
        INSERT INTO study_sessions (id, user_id, skill_id, date, duration_minutes, notes)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(skill_id)
    .bind(date)
    .bind(duration_minutes)
    .bind(notes)
    .execute(pool)
    .await?;

    get_session(pool, user_id, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created session".to_string()))
}

pub async fn list_sessions(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<StudySession>, AppError> {
    let query = format!("{SELECT_SESSION} WHERE s.user_id = ? ORDER BY s.date DESC, s.created_at DESC");
    let sessions = sqlx::query_as::<_, StudySession>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(sessions)
}

pub async fn get_session(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<Option<StudySession>, AppError> {
    let query = format!("{SELECT_SESSION} WHERE s.id = ? AND s.user_id = ?");
    let session = sqlx::query_as::<_, StudySession>(&query)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(session)
}

pub async fn update_session(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
    skill_id: &str,
    date: &str,
    duration_minutes: i64,
    notes: Option<&str>,
) -> Result<Option<StudySession>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE study_sessions
        SET skill_id = ?, date = ?, duration_minutes = ?, notes = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(skill_id)
    .bind(date)
    .bind(duration_minutes)
    .bind(notes)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_session(pool, user_id, id).await
}

pub async fn delete_session(pool: &SqlitePool, user_id: &str, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM study_sessions WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
