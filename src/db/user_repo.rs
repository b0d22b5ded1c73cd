/// User repository - handles all database operations for accounts
use crate::models::User;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new regular account
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    insert_user(pool, email, password_hash, false, false).await
}

/// Create a staff + superuser account (CLI bootstrap)
pub async fn create_admin(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    insert_user(pool, email, password_hash, true, true).await
}

async fn insert_user(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    is_staff: bool,
    is_superuser: bool,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, password_hash, is_staff, is_superuser, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING id, email, password_hash, is_staff, is_superuser, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(email.to_lowercase())
    .bind(password_hash)
    .bind(is_staff)
    .bind(is_superuser)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Find a user by email
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, is_staff, is_superuser, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email.to_lowercase())
    .fetch_optional(pool)
    .await
}

/// Find a user by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, is_staff, is_superuser, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Check if email is already taken
pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
        "#,
    )
    .bind(email.to_lowercase())
    .fetch_one(pool)
    .await
}

/// Full-resource update of the account record (email and password hash)
pub async fn update_account(
    pool: &PgPool,
    user_id: Uuid,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET email = $1, password_hash = $2, updated_at = $3
        WHERE id = $4
        RETURNING id, email, password_hash, is_staff, is_superuser, created_at, updated_at
        "#,
    )
    .bind(email.to_lowercase())
    .bind(password_hash)
    .bind(now)
    .bind(user_id)
    .fetch_one(pool)
    .await
}
