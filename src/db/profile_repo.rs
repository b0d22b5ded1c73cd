/// Profile repository
use crate::models::{Profile, ProfileListItem};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

/// Create the profile for an account; the unique constraint on user_id
/// enforces the one-profile-per-account invariant.
pub async fn create_profile(
    pool: &PgPool,
    user_id: Uuid,
    username: &str,
    bio: &str,
) -> Result<Profile, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (id, user_id, username, bio, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, user_id, username, bio, picture, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(username)
    .bind(bio)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, user_id, username, bio, picture, created_at, updated_at
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_user_id(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, user_id, username, bio, picture, created_at, updated_at
        FROM profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// List profiles with an optional case-insensitive username substring filter.
/// Follower/following counts are computed live from the relation table.
pub async fn list_profiles(
    pool: &PgPool,
    username_filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<ProfileListItem>, sqlx::Error> {
    sqlx::query_as::<_, ProfileListItem>(
        r#"
        SELECT pr.id, pr.user_id, pr.username, pr.picture,
               (SELECT COUNT(*) FROM follows f WHERE f.followee_id = pr.user_id) AS followers_count,
               (SELECT COUNT(*) FROM follows f WHERE f.follower_id = pr.user_id) AS following_count
        FROM profiles pr
        WHERE ($1::text IS NULL OR pr.username ILIKE '%' || $1 || '%')
        ORDER BY pr.username ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(username_filter)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Check if a username is already taken (optionally excluding one profile,
/// for updates)
pub async fn username_exists(
    pool: &PgPool,
    username: &str,
    exclude_profile_id: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM profiles
            WHERE username = $1 AND ($2::uuid IS NULL OR id != $2)
        )
        "#,
    )
    .bind(username)
    .bind(exclude_profile_id)
    .fetch_one(pool)
    .await
}

/// Full-resource update (username, bio)
pub async fn update_profile(
    pool: &PgPool,
    profile_id: Uuid,
    username: &str,
    bio: &str,
) -> Result<Profile, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles
        SET username = $1, bio = $2, updated_at = $3
        WHERE id = $4
        RETURNING id, user_id, username, bio, picture, created_at, updated_at
        "#,
    )
    .bind(username)
    .bind(bio)
    .bind(now)
    .bind(profile_id)
    .fetch_one(pool)
    .await
}

/// Point the profile at a newly stored picture; returns the previous path so
/// the caller can remove the file.
pub async fn update_picture(
    pool: &PgPool,
    profile_id: Uuid,
    picture: &str,
) -> Result<Option<String>, sqlx::Error> {
    let previous: Option<String> = sqlx::query_scalar(
        r#"
        SELECT picture FROM profiles WHERE id = $1
        "#,
    )
    .bind(profile_id)
    .fetch_one(pool)
    .await?;

    sqlx::query(
        r#"
        UPDATE profiles
        SET picture = $1, updated_at = NOW()
        WHERE id = $2
        "#,
    )
    .bind(picture)
    .bind(profile_id)
    .execute(pool)
    .await?;

    Ok(previous)
}
