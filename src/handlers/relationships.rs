/// Follow/unfollow handlers - the symmetric relationship toggler
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{follow_repo, profile_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::Profile;

#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub status: String,
    pub following: bool,
}

async fn target_profile(pool: &PgPool, profile_id: Uuid) -> Result<Profile> {
    profile_repo::find_by_id(pool, profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

/// POST /api/v1/profiles/{id}/follow
///
/// Idempotent: following an already-followed profile is a no-op.
pub async fn follow_profile(
    pool: web::Data<PgPool>,
    profile_id: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    let target = target_profile(&pool, *profile_id).await?;

    if target.user_id == user.0 {
        return Err(AppError::SelfFollow);
    }

    let inserted = follow_repo::follow(&pool, user.0, target.user_id).await?;
    if inserted {
        tracing::info!(follower = %user.0, followee = %target.user_id, "new follow");
    }

    Ok(HttpResponse::Ok().json(FollowResponse {
        status: "ok".to_string(),
        following: true,
    }))
}

/// POST /api/v1/profiles/{id}/unfollow
///
/// Idempotent: removing an absent edge is a no-op.
pub async fn unfollow_profile(
    pool: web::Data<PgPool>,
    profile_id: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    let target = target_profile(&pool, *profile_id).await?;

    follow_repo::unfollow(&pool, user.0, target.user_id).await?;

    Ok(HttpResponse::Ok().json(FollowResponse {
        status: "ok".to_string(),
        following: false,
    }))
}

/// GET /api/v1/profiles/{id}/followers
pub async fn get_followers(
    pool: web::Data<PgPool>,
    profile_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let target = target_profile(&pool, *profile_id).await?;
    let followers = follow_repo::followers_of(&pool, target.user_id).await?;

    Ok(HttpResponse::Ok().json(followers))
}

/// GET /api/v1/profiles/{id}/following
pub async fn get_following(
    pool: web::Data<PgPool>,
    profile_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let target = target_profile(&pool, *profile_id).await?;
    let following = follow_repo::following_of(&pool, target.user_id).await?;

    Ok(HttpResponse::Ok().json(following))
}
