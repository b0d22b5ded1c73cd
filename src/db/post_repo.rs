/// Post repository
use crate::models::{Post, PostListItem};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_post(
    pool: &PgPool,
    title: &str,
    content: &str,
    author_profile_id: Uuid,
) -> Result<Post, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, title, content, author_profile_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, title, content, image, author_profile_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(content)
    .bind(author_profile_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, image, author_profile_id, created_at, updated_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

/// List posts newest-first with optional conjunctive case-insensitive
/// substring filters on title and author username. Engagement counts are
/// live count queries, not cached counters.
pub async fn list_posts(
    pool: &PgPool,
    title_filter: Option<&str>,
    author_filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostListItem>, sqlx::Error> {
    sqlx::query_as::<_, PostListItem>(
        r#"
        SELECT p.id,
               pr.username AS author,
               p.title, p.content, p.created_at, p.image,
               (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
               (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
        FROM posts p
        LEFT JOIN profiles pr ON p.author_profile_id = pr.id
        WHERE ($1::text IS NULL OR p.title ILIKE '%' || $1 || '%')
          AND ($2::text IS NULL OR pr.username ILIKE '%' || $2 || '%')
        ORDER BY p.created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(title_filter)
    .bind(author_filter)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Full-resource update (title, content)
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    title: &str,
    content: &str,
) -> Result<Post, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = $1, content = $2, updated_at = $3
        WHERE id = $4
        RETURNING id, title, content, image, author_profile_id, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(now)
    .bind(post_id)
    .fetch_one(pool)
    .await
}

/// Delete a post; comments and likes go with it via ON DELETE CASCADE.
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Resolve the account that owns a post's author profile.
/// Outer None: no such post. Inner None: post has no author.
pub async fn owner_user_id(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<Option<Uuid>>, sqlx::Error> {
    let row = sqlx::query_as::<_, (Option<Uuid>,)>(
        r#"
        SELECT pr.user_id
        FROM posts p
        LEFT JOIN profiles pr ON p.author_profile_id = pr.id
        WHERE p.id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(owner,)| owner))
}

/// Point the post at a newly stored image; returns the previous path.
pub async fn update_image(
    pool: &PgPool,
    post_id: Uuid,
    image: &str,
) -> Result<Option<String>, sqlx::Error> {
    let previous: Option<String> = sqlx::query_scalar(
        r#"
        SELECT image FROM posts WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_one(pool)
    .await?;

    sqlx::query(
        r#"
        UPDATE posts
        SET image = $1, updated_at = NOW()
        WHERE id = $2
        "#,
    )
    .bind(image)
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(previous)
}
