use crate::error::AppError;
use crate::models::Skill;
use sqlx::SqlitePool;

pub async fn create_skill(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    name: &str,
    description: &str,
    category: Option<&str>,
) -> Result<Skill, AppError> {
    sqlx::query(
        r#"
        INSERT INTO skills (id, user_id, name, description, category)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .bind(description)
    .bind(category)
    .execute(pool)
    .await?;

    get_skill(pool, user_id, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created skill".to_string()))
}

pub async fn list_skills(pool: &SqlitePool, user_id: &str) -> Result<Vec<Skill>, AppError> {
    let skills = sqlx::query_as::<_, Skill>(
        r#"
        SELECT id, user_id, name, description, category, created_at, updated_at
        FROM skills
        WHERE user_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(skills)
}

pub async fn get_skill(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<Option<Skill>, AppError> {
    let skill = sqlx::query_as::<_, Skill>(
        r#"
        SELECT id, user_id, name, description, category, created_at, updated_at
        FROM skills
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(skill)
}

pub async fn update_skill(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
    name: &str,
    description: &str,
    category: Option<&str>,
) -> Result<Option<Skill>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE skills
        SET name = ?, description = ?, category = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(category)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_skill(pool, user_id, id).await
}

/// Deletes an owned skill; its sessions and profile links go with it via
/// `ON DELETE CASCADE`.
pub async fn delete_skill(pool: &SqlitePool, user_id: &str, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM skills WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;

    #[tokio::test]
    async fn skills_are_scoped_to_their_owner() {
        let pool = testing::pool().await;
        let alice = testing::seed_user(&pool, "alice").await;
        let bob = testing::seed_user(&pool, "bob").await;
        let skill_id = testing::seed_skill(&pool, &alice, "Rust", Some("programming")).await;

        // Owner sees it, the other user does not.
        assert!(get_skill(&pool, &alice, &skill_id).await.unwrap().is_some());
        assert!(get_skill(&pool, &bob, &skill_id).await.unwrap().is_none());

        assert_eq!(list_skills(&pool, &alice).await.unwrap().len(), 1);
        assert!(list_skills(&pool, &bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_miss_foreign_rows() {
        let pool = testing::pool().await;
        let alice = testing::seed_user(&pool, "alice").await;
        let bob = testing::seed_user(&pool, "bob").await;
        let skill_id = testing::seed_skill(&pool, &alice, "Rust", None).await;

        let updated = update_skill(&pool, &bob, &skill_id, "Hijacked", "nope", None)
            .await
            .unwrap();
        assert!(updated.is_none());
        assert!(!delete_skill(&pool, &bob, &skill_id).await.unwrap());

        // Untouched for the real owner.
        let skill = get_skill(&pool, &alice, &skill_id).await.unwrap().unwrap();
        assert_eq!(skill.name, "Rust");
    }

    #[tokio::test]
    async fn update_replaces_all_fields() {
        let pool = testing::pool().await;
        let alice = testing::seed_user(&pool, "alice").await;
        let skill_id = testing::seed_skill(&pool, &alice, "Rust", Some("programming")).await;

        let updated = update_skill(&pool, &alice, &skill_id, "Espanol", "b2 level", Some("languages"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Espanol");
        assert_eq!(updated.category.as_deref(), Some("languages"));
    }

    #[tokio::test]
    async fn deleting_a_skill_cascades_to_its_sessions() {
        let pool = testing::pool().await;
        let alice = testing::seed_user(&pool, "alice").await;
        let skill_id = testing::seed_skill(&pool, &alice, "Rust", None).await;
        testing::seed_session(&pool, &alice, &skill_id, "2026-03-01", 30).await;
        testing::seed_session(&pool, &alice, &skill_id, "2026-03-02", 60).await;

        assert!(delete_skill(&pool, &alice, &skill_id).await.unwrap());

        let sessions = crate::db::sessions::list_sessions(&pool, &alice).await.unwrap();
        assert!(sessions.is_empty());
    }
}
