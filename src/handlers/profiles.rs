/// Profile handlers - HTTP endpoints for public social identities
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::profile_repo;
use crate::error::{AppError, Result};
use crate::handlers::{clamp_page, non_empty, read_upload};
use crate::middleware::{permissions, UserId};
use crate::services::media::{MediaStorage, PROFILE_SUBDIR};
use crate::services::profiles::profile_detail;
use crate::validators;

#[derive(Debug, Deserialize)]
pub struct ProfileListQuery {
    pub username: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub bio: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub bio: String,
}

/// GET /api/v1/profiles?username=<substring>
pub async fn list_profiles(
    pool: web::Data<PgPool>,
    query: web::Query<ProfileListQuery>,
) -> Result<HttpResponse> {
    let (limit, offset) = clamp_page(query.limit, query.offset);
    let profiles =
        profile_repo::list_profiles(&pool, non_empty(&query.username), limit, offset).await?;

    Ok(HttpResponse::Ok().json(profiles))
}

/// POST /api/v1/profiles
pub async fn create_profile(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<CreateProfileRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if !validators::validate_username(&req.username) {
        return Err(AppError::Validation("Invalid username format".to_string()));
    }

    if profile_repo::find_by_user_id(&pool, user.0).await?.is_some() {
        return Err(AppError::Conflict(
            "A profile already exists for this account".to_string(),
        ));
    }

    if profile_repo::username_exists(&pool, &req.username, None).await? {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let profile = profile_repo::create_profile(&pool, user.0, &req.username, &req.bio).await?;

    tracing::info!(profile_id = %profile.id, user_id = %user.0, "profile created");

    Ok(HttpResponse::Created().json(profile))
}

/// GET /api/v1/profiles/{id}
pub async fn get_profile(
    pool: web::Data<PgPool>,
    profile_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let profile = profile_repo::find_by_id(&pool, *profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    let detail = profile_detail(&pool, profile).await?;

    Ok(HttpResponse::Ok().json(detail))
}

/// PUT /api/v1/profiles/{id}
pub async fn update_profile(
    pool: web::Data<PgPool>,
    profile_id: web::Path<Uuid>,
    user: UserId,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if !validators::validate_username(&req.username) {
        return Err(AppError::Validation("Invalid username format".to_string()));
    }

    let profile = profile_repo::find_by_id(&pool, *profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    permissions::ensure_can_modify(&pool, user.0, Some(profile.user_id)).await?;

    if profile_repo::username_exists(&pool, &req.username, Some(profile.id)).await? {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let updated = profile_repo::update_profile(&pool, profile.id, &req.username, &req.bio).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// POST /api/v1/profiles/{id}/upload-image
///
/// Multipart upload of the profile picture (field `picture`).
pub async fn upload_profile_image(
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    profile_id: web::Path<Uuid>,
    user: UserId,
    payload: Multipart,
) -> Result<HttpResponse> {
    let profile = profile_repo::find_by_id(&pool, *profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    permissions::ensure_can_modify(&pool, user.0, Some(profile.user_id)).await?;

    let bytes = read_upload(payload).await?;
    let stored = storage.save_image(PROFILE_SUBDIR, &profile.username, &bytes)?;

    let previous = profile_repo::update_picture(&pool, profile.id, &stored).await?;
    if let Some(old) = previous {
        storage.remove(&old);
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": profile.id,
        "picture": stored,
    })))
}
