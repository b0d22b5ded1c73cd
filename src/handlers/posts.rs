/// Post handlers - HTTP endpoints for post operations
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::{comment_repo, like_repo, post_repo, profile_repo};
use crate::error::{AppError, Result};
use crate::handlers::{clamp_page, non_empty, read_upload};
use crate::middleware::{permissions, UserId};
use crate::models::PostDetail;
use crate::services::media::{MediaStorage, POST_SUBDIR};
use crate::services::profiles::profile_detail;

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 65))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 65))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,
}

/// GET /api/v1/posts?title=<substring>&author=<substring>
///
/// Filters combine conjunctively; absent filters are no-ops.
pub async fn list_posts(
    pool: web::Data<PgPool>,
    query: web::Query<PostListQuery>,
) -> Result<HttpResponse> {
    let (limit, offset) = clamp_page(query.limit, query.offset);
    let posts = post_repo::list_posts(
        &pool,
        non_empty(&query.title),
        non_empty(&query.author),
        limit,
        offset,
    )
    .await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// POST /api/v1/posts
pub async fn create_post(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let author = profile_repo::find_by_user_id(&pool, user.0)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("A profile is required to create posts".to_string())
        })?;

    let post = post_repo::create_post(&pool, &req.title, &req.content, author.id).await?;

    tracing::info!(post_id = %post.id, author = %author.username, "post created");

    Ok(HttpResponse::Created().json(post))
}

/// GET /api/v1/posts/{id}
pub async fn get_post(pool: web::Data<PgPool>, post_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let post = post_repo::find_post_by_id(&pool, *post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let author = match post.author_profile_id {
        Some(profile_id) => match profile_repo::find_by_id(&pool, profile_id).await? {
            Some(profile) => Some(profile_detail(&pool, profile).await?),
            None => None,
        },
        None => None,
    };

    let (like_count, comment_count) = tokio::try_join!(
        like_repo::count_likes_by_post(&pool, post.id),
        comment_repo::count_by_post(&pool, post.id),
    )?;

    Ok(HttpResponse::Ok().json(PostDetail {
        id: post.id,
        author,
        title: post.title,
        content: post.content,
        created_at: post.created_at,
        image: post.image,
        like_count,
        comment_count,
    }))
}

/// PUT /api/v1/posts/{id}
pub async fn update_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    user: UserId,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let owner = post_repo::owner_user_id(&pool, *post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    permissions::ensure_can_modify(&pool, user.0, owner).await?;

    let updated = post_repo::update_post(&pool, *post_id, &req.title, &req.content).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/v1/posts/{id}
///
/// Comments and likes cascade with the post.
pub async fn delete_post(
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    post_id: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    let post = post_repo::find_post_by_id(&pool, *post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let owner = post_repo::owner_user_id(&pool, post.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    permissions::ensure_can_modify(&pool, user.0, owner).await?;

    post_repo::delete_post(&pool, post.id).await?;
    if let Some(image) = post.image {
        storage.remove(&image);
    }

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/v1/posts/{id}/upload-image
///
/// Multipart upload of the post image (field `image`).
pub async fn upload_post_image(
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    post_id: web::Path<Uuid>,
    user: UserId,
    payload: Multipart,
) -> Result<HttpResponse> {
    let post = post_repo::find_post_by_id(&pool, *post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let owner = post_repo::owner_user_id(&pool, post.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    permissions::ensure_can_modify(&pool, user.0, owner).await?;

    let bytes = read_upload(payload).await?;
    let stored = storage.save_image(POST_SUBDIR, &post.title, &bytes)?;

    let previous = post_repo::update_image(&pool, post.id, &stored).await?;
    if let Some(old) = previous {
        storage.remove(&old);
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": post.id,
        "image": stored,
    })))
}
