/// Like handlers - the at-most-once like toggler
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{like_repo, post_repo};
use crate::error::{AppError, Result};
use crate::handlers::PaginationParams;
use crate::middleware::UserId;
use crate::models::Like;

#[derive(Debug, Serialize)]
pub struct LikeListResponse {
    pub likes: Vec<Like>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct LikeStatusResponse {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub has_liked: bool,
    pub total_likes: i64,
}

async fn ensure_post_exists(pool: &PgPool, post_id: Uuid) -> Result<()> {
    post_repo::find_post_by_id(pool, post_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
}

/// POST /api/v1/posts/{post_id}/like
///
/// The insert races against the UNIQUE (post_id, user_id) constraint; a
/// conflicting insert reports AlreadyLiked rather than creating a duplicate.
pub async fn like_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    ensure_post_exists(&pool, *post_id).await?;

    match like_repo::create_like(&pool, *post_id, user.0).await? {
        Some(like) => Ok(HttpResponse::Created().json(like)),
        None => Err(AppError::AlreadyLiked),
    }
}

/// DELETE /api/v1/posts/{post_id}/like
pub async fn unlike_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    ensure_post_exists(&pool, *post_id).await?;

    let removed = like_repo::delete_likes(&pool, *post_id, user.0).await?;
    if removed == 0 {
        return Err(AppError::NotLiked);
    }

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/posts/{post_id}/likes?limit=50&offset=0
pub async fn get_post_likes(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    ensure_post_exists(&pool, *post_id).await?;

    let (limit, offset) = (query.limit(), query.offset());
    let (likes, total_count) = tokio::try_join!(
        like_repo::get_likes_by_post(&pool, *post_id, limit, offset),
        like_repo::count_likes_by_post(&pool, *post_id),
    )?;

    Ok(HttpResponse::Ok().json(LikeListResponse {
        likes,
        total_count,
        limit,
        offset,
    }))
}

/// GET /api/v1/posts/{post_id}/like/status
pub async fn check_like_status(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    ensure_post_exists(&pool, *post_id).await?;

    let (has_liked, total_likes) = tokio::try_join!(
        like_repo::has_liked(&pool, *post_id, user.0),
        like_repo::count_likes_by_post(&pool, *post_id),
    )?;

    Ok(HttpResponse::Ok().json(LikeStatusResponse {
        post_id: *post_id,
        user_id: user.0,
        has_liked,
        total_likes,
    }))
}
