/// Ownership-based permission checks for profiles, posts, and comments.
///
/// Unsafe operations require the requester to be the resource owner or a
/// staff account; read access is gated by the auth middleware alone.
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use sqlx::PgPool;

/// Pure owner-or-admin decision over a resolved principal.
pub fn can_modify(requester_id: Uuid, requester_is_admin: bool, owner_id: Option<Uuid>) -> bool {
    requester_is_admin || owner_id == Some(requester_id)
}

/// Load the requester and enforce the write gate against the stored owner.
///
/// `owner_id` is `None` for ownerless resources (e.g. posts whose author
/// profile was deleted); those are only writable by admins.
pub async fn ensure_can_modify(
    pool: &PgPool,
    requester_id: Uuid,
    owner_id: Option<Uuid>,
) -> Result<()> {
    if owner_id == Some(requester_id) {
        return Ok(());
    }

    let requester = user_repo::find_by_id(pool, requester_id)
        .await?
        .ok_or_else(|| AppError::Authentication("Unknown account".to_string()))?;

    if requester.is_admin() {
        Ok(())
    } else {
        Err(AppError::Authorization(
            "You don't have permission to modify this resource".to_string(),
        ))
    }
}
