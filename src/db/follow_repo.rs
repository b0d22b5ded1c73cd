/// Follow relationship repository
///
/// Explicit (follower_id, followee_id) relation table; the primary key makes
/// both follow and unfollow idempotent at the database level.
use sqlx::PgPool;
use uuid::Uuid;

/// Idempotent create follow; returns true if a new edge was inserted.
pub async fn follow(
    pool: &PgPool,
    follower_id: Uuid,
    followee_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO follows (follower_id, followee_id, created_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (follower_id, followee_id) DO NOTHING
        "#,
    )
    .bind(follower_id)
    .bind(followee_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Idempotent delete; returns true if an edge was removed.
pub async fn unfollow(
    pool: &PgPool,
    follower_id: Uuid,
    followee_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE follower_id = $1 AND followee_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(followee_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Accounts following the given account, computed live from the relation
/// table (no denormalized reverse set).
pub async fn followers_of(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT follower_id
        FROM follows
        WHERE followee_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Accounts the given account follows.
pub async fn following_of(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT followee_id
        FROM follows
        WHERE follower_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
