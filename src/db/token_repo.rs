/// Refresh-token persistence: hashes only, never the raw token.
use crate::models::RefreshTokenRecord;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

/// SHA-256 hex digest of a raw refresh token.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

pub async fn store_refresh_token(
    pool: &PgPool,
    user_id: Uuid,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<RefreshTokenRecord, sqlx::Error> {
    sqlx::query_as::<_, RefreshTokenRecord>(
        r#"
        INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, token_hash, expires_at, is_revoked, revoked_at, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(hash_token(token))
    .bind(expires_at)
    .fetch_one(pool)
    .await
}

/// Find a live (unrevoked, unexpired) refresh token by its raw value.
pub async fn find_active(
    pool: &PgPool,
    token: &str,
) -> Result<Option<RefreshTokenRecord>, sqlx::Error> {
    sqlx::query_as::<_, RefreshTokenRecord>(
        r#"
        SELECT id, user_id, token_hash, expires_at, is_revoked, revoked_at, created_at
        FROM refresh_tokens
        WHERE token_hash = $1 AND is_revoked = FALSE AND expires_at > NOW()
        "#,
    )
    .bind(hash_token(token))
    .fetch_optional(pool)
    .await
}

/// Revoke a refresh token by its raw value; returns true if a live token was
/// revoked.
pub async fn revoke(pool: &PgPool, token: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET is_revoked = TRUE, revoked_at = NOW()
        WHERE token_hash = $1 AND is_revoked = FALSE
        "#,
    )
    .bind(hash_token(token))
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
