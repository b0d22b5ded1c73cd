/// Assembly of the profile detail shape shared by the profile and post
/// detail endpoints.
use sqlx::PgPool;

use crate::db::{follow_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::{Profile, ProfileDetail};

/// Build the detail view: embedded public account record plus live
/// follower/following account-id lists.
pub async fn profile_detail(pool: &PgPool, profile: Profile) -> Result<ProfileDetail> {
    let user = user_repo::find_by_id(pool, profile.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile owner not found".to_string()))?;

    let (followers, following) = tokio::try_join!(
        follow_repo::followers_of(pool, profile.user_id),
        follow_repo::following_of(pool, profile.user_id),
    )?;

    Ok(ProfileDetail {
        id: profile.id,
        user: user.into(),
        username: profile.username,
        bio: profile.bio,
        picture: profile.picture,
        followers,
        following,
    })
}
