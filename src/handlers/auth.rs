/// Account lifecycle handlers: register, token issuance, refresh, logout.
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::db::{token_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::PublicUser;
use crate::security::{jwt, password};
use crate::validators;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// POST /api/v1/auth/register
pub async fn register(
    pool: web::Data<PgPool>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if !validators::validate_password(&req.password) {
        return Err(AppError::Validation(
            "Password must contain upper and lower case letters, a digit, and a special character"
                .to_string(),
        ));
    }

    if user_repo::email_exists(&pool, &req.email).await? {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;
    let user = user_repo::create_user(&pool, &req.email, &password_hash).await?;

    tracing::info!(user_id = %user.id, "account registered");

    Ok(HttpResponse::Created().json(PublicUser::from(user)))
}

/// POST /api/v1/auth/token
pub async fn login(pool: web::Data<PgPool>, req: web::Json<LoginRequest>) -> Result<HttpResponse> {
    req.validate()?;

    let user = user_repo::find_by_email(&pool, &req.email)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Authentication("Invalid credentials".to_string()));
    }

    let tokens = jwt::generate_token_pair(user.id, &user.email)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    token_repo::store_refresh_token(
        &pool,
        user.id,
        &tokens.refresh_token,
        refresh_expiry(&tokens.refresh_token),
    )
    .await?;

    tracing::info!(user_id = %user.id, "login successful");

    Ok(HttpResponse::Ok().json(tokens))
}

/// POST /api/v1/auth/token/refresh
///
/// Rotation: the presented token is revoked and a fresh pair is issued.
pub async fn refresh_token(
    pool: web::Data<PgPool>,
    req: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse> {
    let claims = jwt::validate_refresh_token(&req.refresh_token)
        .map_err(|_| AppError::Authentication("Invalid or expired refresh token".to_string()))?;

    let record = token_repo::find_active(&pool, &req.refresh_token)
        .await?
        .ok_or_else(|| AppError::Authentication("Refresh token revoked".to_string()))?;

    token_repo::revoke(&pool, &req.refresh_token).await?;

    let tokens = jwt::generate_token_pair(record.user_id, &claims.email)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    token_repo::store_refresh_token(
        &pool,
        record.user_id,
        &tokens.refresh_token,
        refresh_expiry(&tokens.refresh_token),
    )
    .await?;

    Ok(HttpResponse::Ok().json(tokens))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse> {
    if !token_repo::revoke(&pool, &req.refresh_token).await? {
        return Err(AppError::BadRequest(
            "Unknown or already revoked refresh token".to_string(),
        ));
    }

    tracing::info!(user_id = %user.0, "logged out");

    Ok(HttpResponse::NoContent().finish())
}

/// Expiry for the stored refresh-token record, read from the token's own
/// exp claim with a conservative fallback.
fn refresh_expiry(refresh_token: &str) -> DateTime<Utc> {
    jwt::validate_token(refresh_token)
        .ok()
        .and_then(|data| DateTime::from_timestamp(data.claims.exp, 0))
        .unwrap_or_else(|| Utc::now() + Duration::days(30))
}
