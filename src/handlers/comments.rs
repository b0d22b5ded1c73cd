/// Comment handlers - HTTP endpoints for comment operations
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::{comment_repo, post_repo, profile_repo};
use crate::error::{AppError, Result};
use crate::handlers::{clamp_page, non_empty};
use crate::middleware::{permissions, UserId};

#[derive(Debug, Deserialize)]
pub struct CommentListQuery {
    /// Case-insensitive substring filter on the parent post's title.
    pub post: Option<String>,
    /// Case-insensitive substring filter on the author's username.
    pub author: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,

    #[validate(length(min = 1, max = 500))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 500))]
    pub content: String,
}

/// GET /api/v1/comments?post=<substring>&author=<substring>
pub async fn list_comments(
    pool: web::Data<PgPool>,
    query: web::Query<CommentListQuery>,
) -> Result<HttpResponse> {
    let (limit, offset) = clamp_page(query.limit, query.offset);
    let comments = comment_repo::list_comments(
        &pool,
        non_empty(&query.post),
        non_empty(&query.author),
        limit,
        offset,
    )
    .await?;

    Ok(HttpResponse::Ok().json(comments))
}

/// POST /api/v1/comments
pub async fn create_comment(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    post_repo::find_post_by_id(&pool, req.post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let author = profile_repo::find_by_user_id(&pool, user.0)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("A profile is required to comment".to_string())
        })?;

    let comment = comment_repo::create_comment(&pool, req.post_id, author.id, &req.content).await?;

    Ok(HttpResponse::Created().json(comment))
}

/// GET /api/v1/comments/{id}
pub async fn get_comment(
    pool: web::Data<PgPool>,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment = comment_repo::find_detail_by_id(&pool, *comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    Ok(HttpResponse::Ok().json(comment))
}

/// PUT /api/v1/comments/{id}
pub async fn update_comment(
    pool: web::Data<PgPool>,
    comment_id: web::Path<Uuid>,
    user: UserId,
    req: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let owner = comment_repo::owner_user_id(&pool, *comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    permissions::ensure_can_modify(&pool, user.0, Some(owner)).await?;

    let updated = comment_repo::update_comment(&pool, *comment_id, &req.content).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    comment_id: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    let owner = comment_repo::owner_user_id(&pool, *comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    permissions::ensure_can_modify(&pool, user.0, Some(owner)).await?;

    comment_repo::delete_comment(&pool, *comment_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
