/// Comment repository
use crate::models::{Comment, CommentListItem};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_comment(
    pool: &PgPool,
    post_id: Uuid,
    author_profile_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (id, post_id, author_profile_id, content, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, post_id, author_profile_id, content, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(post_id)
    .bind(author_profile_id)
    .bind(content)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, comment_id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, author_profile_id, content, created_at, updated_at
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await
}

/// Detail shape with the author flattened to its username.
pub async fn find_detail_by_id(
    pool: &PgPool,
    comment_id: Uuid,
) -> Result<Option<CommentListItem>, sqlx::Error> {
    sqlx::query_as::<_, CommentListItem>(
        r#"
        SELECT c.id, c.post_id, pr.username AS author, c.content, c.created_at
        FROM comments c
        JOIN profiles pr ON c.author_profile_id = pr.id
        WHERE c.id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await
}

/// List comments newest-first with optional conjunctive case-insensitive
/// substring filters on the parent post's title and the author's username.
pub async fn list_comments(
    pool: &PgPool,
    post_filter: Option<&str>,
    author_filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<CommentListItem>, sqlx::Error> {
    sqlx::query_as::<_, CommentListItem>(
        r#"
        SELECT c.id, c.post_id, pr.username AS author, c.content, c.created_at
        FROM comments c
        JOIN profiles pr ON c.author_profile_id = pr.id
        JOIN posts p ON c.post_id = p.id
        WHERE ($1::text IS NULL OR p.title ILIKE '%' || $1 || '%')
          AND ($2::text IS NULL OR pr.username ILIKE '%' || $2 || '%')
        ORDER BY c.created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(post_filter)
    .bind(author_filter)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Full-resource update (content)
pub async fn update_comment(
    pool: &PgPool,
    comment_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET content = $1, updated_at = $2
        WHERE id = $3
        RETURNING id, post_id, author_profile_id, content, created_at, updated_at
        "#,
    )
    .bind(content)
    .bind(now)
    .bind(comment_id)
    .fetch_one(pool)
    .await
}

/// Live comment count for a post
pub async fn count_by_post(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await
}

pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Resolve the account that owns a comment's author profile.
pub async fn owner_user_id(
    pool: &PgPool,
    comment_id: Uuid,
) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT pr.user_id
        FROM comments c
        JOIN profiles pr ON c.author_profile_id = pr.id
        WHERE c.id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await
}
