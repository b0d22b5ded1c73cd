pub mod comment_repo;
pub mod follow_repo;
pub mod like_repo;
pub mod post_repo;
pub mod profile_repo;
pub mod token_repo;
pub mod user_repo;
