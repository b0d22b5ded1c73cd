/// Account management for the authenticated principal.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::PublicUser;
use crate::security::password;
use crate::validators;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// GET /api/v1/users/me
pub async fn get_current_user(pool: web::Data<PgPool>, user: UserId) -> Result<HttpResponse> {
    let account = user_repo::find_by_id(&pool, user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

    Ok(HttpResponse::Ok().json(PublicUser::from(account)))
}

/// PUT /api/v1/users/me
///
/// Full-resource update of the account; staff flags are read-only over HTTP.
pub async fn update_current_user(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<UpdateAccountRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if !validators::validate_password(&req.password) {
        return Err(AppError::Validation(
            "Password must contain upper and lower case letters, a digit, and a special character"
                .to_string(),
        ));
    }

    if let Some(existing) = user_repo::find_by_email(&pool, &req.email).await? {
        if existing.id != user.0 {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
    }

    let password_hash = password::hash_password(&req.password)?;
    let updated = user_repo::update_account(&pool, user.0, &req.email, &password_hash).await?;

    Ok(HttpResponse::Ok().json(PublicUser::from(updated)))
}
