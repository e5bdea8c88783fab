//! Profile queries. A profile is created alongside its user at registration
//! and updated as a whole: bio, picture, optional address, linked skills.

use crate::error::AppError;
use crate::models::{Address, AddressRequest, ProfileResponse, UserProfile};
use sqlx::SqlitePool;

pub async fn create_profile(pool: &SqlitePool, id: &str, user_id: &str) -> Result<(), AppError> {
    sqlx::query("INSERT INTO user_profiles (id, user_id) VALUES (?, ?)")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn get_profile(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<ProfileResponse>, AppError> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT id, user_id, bio, profile_picture, address_id, created_at, updated_at
        FROM user_profiles
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let Some(profile) = profile else {
        return Ok(None);
    };

    let address = match &profile.address_id {
        Some(address_id) => {
            sqlx::query_as::<_, Address>(
                "SELECT id, country, city, post_code, street FROM addresses WHERE id = ?",
            )
            .bind(address_id)
            .fetch_optional(pool)
            .await?
        }
        None => None,
    };

    let skill_ids: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT skill_id
        FROM user_profile_skills
        WHERE profile_id = ?
        ORDER BY skill_id
        "#,
    )
    .bind(&profile.id)
    .fetch_all(pool)
    .await?;

    Ok(Some(ProfileResponse {
        id: profile.id,
        user_id: profile.user_id,
        bio: profile.bio,
        profile_picture: profile.profile_picture,
        address,
        skill_ids,
        created_at: profile.created_at,
        updated_at: profile.updated_at,
    }))
}

/// Full-replace update of the caller's profile inside one transaction.
///
/// The previous address row, if any, is dropped and replaced by the one in
/// the request (or by nothing). Skill links are replaced wholesale; skill
/// ownership is checked by the handler before this is called. A `None`
/// picture keeps the current one.
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: &str,
    bio: Option<&str>,
    profile_picture: Option<&str>,
    address: Option<&AddressRequest>,
    skill_ids: &[String],
) -> Result<Option<ProfileResponse>, AppError> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT id, user_id, bio, profile_picture, address_id, created_at, updated_at
        FROM user_profiles
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let Some(profile) = profile else {
        return Ok(None);
    };

    let mut tx = pool.begin().await?;

    let new_address_id = match address {
        Some(address) => {
            let id = uuid::Uuid::now_v7().to_string();
            sqlx::query(
                r#"
                INSERT INTO addresses (id, country, city, post_code, street)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&id)
            .bind(&address.country)
            .bind(&address.city)
            .bind(&address.post_code)
            .bind(&address.street)
            .execute(&mut *tx)
            .await?;
            Some(id)
        }
        None => None,
    };

    sqlx::query(
        r#"
        UPDATE user_profiles
        SET bio = ?, profile_picture = COALESCE(?, profile_picture), address_id = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(bio)
    .bind(profile_picture)
    .bind(&new_address_id)
    .bind(&profile.id)
    .execute(&mut *tx)
    .await?;

    // The old address has no other referent; clean it up.
    if let Some(old_address_id) = &profile.address_id {
        sqlx::query("DELETE FROM addresses WHERE id = ?")
            .bind(old_address_id)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("DELETE FROM user_profile_skills WHERE profile_id = ?")
        .bind(&profile.id)
        .execute(&mut *tx)
        .await?;
    for skill_id in skill_ids {
        sqlx::query("INSERT INTO user_profile_skills (profile_id, skill_id) VALUES (?, ?)")
            .bind(&profile.id)
            .bind(skill_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    get_profile(pool, user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;
    use crate::models::DEFAULT_PROFILE_PICTURE;

    async fn seed_profile(pool: &SqlitePool, user_id: &str) {
        create_profile(pool, &uuid::Uuid::now_v7().to_string(), user_id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn new_profile_has_defaults() {
        let pool = testing::pool().await;
        let alice = testing::seed_user(&pool, "alice").await;
        seed_profile(&pool, &alice).await;

        let profile = get_profile(&pool, &alice).await.unwrap().unwrap();
        assert_eq!(profile.profile_picture, DEFAULT_PROFILE_PICTURE);
        assert!(profile.bio.is_none());
        assert!(profile.address.is_none());
        assert!(profile.skill_ids.is_empty());
    }

    #[tokio::test]
    async fn update_replaces_address_and_skills() {
        let pool = testing::pool().await;
        let alice = testing::seed_user(&pool, "alice").await;
        seed_profile(&pool, &alice).await;
        let skill_id = testing::seed_skill(&pool, &alice, "Rust", None).await;

        let address = AddressRequest {
            country: "Netherlands".to_string(),
            city: "Utrecht".to_string(),
            post_code: "3511".to_string(),
            street: "Domstraat 1".to_string(),
        };
        let updated = update_profile(
            &pool,
            &alice,
            Some("Hello"),
            None,
            Some(&address),
            &[skill_id.clone()],
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.bio.as_deref(), Some("Hello"));
        assert_eq!(updated.profile_picture, DEFAULT_PROFILE_PICTURE);
        assert_eq!(updated.address.as_ref().unwrap().city, "Utrecht");
        assert_eq!(updated.skill_ids, vec![skill_id]);

        // A second update without an address drops the old one.
        let first_address_id = updated.address.unwrap().id;
        let updated = update_profile(&pool, &alice, None, None, None, &[])
            .await
            .unwrap()
            .unwrap();
        assert!(updated.address.is_none());
        assert!(updated.skill_ids.is_empty());

        let orphan: Option<Address> = sqlx::query_as(
            "SELECT id, country, city, post_code, street FROM addresses WHERE id = ?",
        )
        .bind(&first_address_id)
        .fetch_optional(&pool)
        .await
        .unwrap();
        assert!(orphan.is_none());
    }

    #[tokio::test]
    async fn missing_profile_returns_none() {
        let pool = testing::pool().await;
        let alice = testing::seed_user(&pool, "alice").await;

        assert!(get_profile(&pool, &alice).await.unwrap().is_none());
        let updated = update_profile(&pool, &alice, None, None, None, &[])
            .await
            .unwrap();
        assert!(updated.is_none());
    }
}
