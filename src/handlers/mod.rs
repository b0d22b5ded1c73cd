pub mod auth;
pub mod comments;
pub mod health;
pub mod likes;
pub mod posts;
pub mod profiles;
pub mod relationships;
pub mod users;

pub use auth::{login, logout, refresh_token, register};
pub use comments::{create_comment, delete_comment, get_comment, list_comments, update_comment};
pub use health::{health_check, liveness_check, readiness_check};
pub use likes::{check_like_status, get_post_likes, like_post, unlike_post};
pub use posts::{
    create_post, delete_post, get_post, list_posts, update_post, upload_post_image,
};
pub use profiles::{
    create_profile, get_profile, list_profiles, update_profile, upload_profile_image,
};
pub use relationships::{follow_profile, get_followers, get_following, unfollow_profile};
pub use users::{get_current_user, update_current_user};

use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use serde::Deserialize;

use crate::error::{AppError, Result};

const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Pagination query parameters shared by the list endpoints.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        clamp_page(self.limit, self.offset).0
    }

    pub fn offset(&self) -> i64 {
        clamp_page(self.limit, self.offset).1
    }
}

/// Clamp raw limit/offset parameters to sane bounds (default 50, cap 100).
pub(crate) fn clamp_page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (limit.unwrap_or(50).clamp(1, 100), offset.unwrap_or(0).max(0))
}

/// Read the first multipart field into memory, bounded by MAX_UPLOAD_BYTES.
pub(crate) async fn read_upload(mut payload: Multipart) -> Result<Vec<u8>> {
    let mut field = payload
        .try_next()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart payload: {}", e)))?
        .ok_or_else(|| AppError::Validation("Missing file field".to_string()))?;

    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?
    {
        if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::Validation("Image payload too large".to_string()));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

/// Normalize an optional filter: blank strings behave like absent parameters.
pub(crate) fn non_empty(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_caps() {
        assert_eq!(clamp_page(None, None), (50, 0));
        assert_eq!(clamp_page(Some(1000), Some(-5)), (100, 0));
        assert_eq!(clamp_page(Some(0), Some(3)), (1, 3));
    }

    #[test]
    fn test_non_empty_filter() {
        assert_eq!(non_empty(&Some("foo".to_string())), Some("foo"));
        assert_eq!(non_empty(&Some("  ".to_string())), None);
        assert_eq!(non_empty(&None), None);
    }
}
