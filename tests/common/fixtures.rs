/// Shared fixtures for database-backed integration tests.
///
/// Requires a running Postgres reachable via TEST_DATABASE_URL (falls back
/// to DATABASE_URL). Each suite cleans the tables it touches.
use once_cell::sync::Lazy;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use ripple::db::{post_repo, profile_repo, user_repo};
use ripple::models::{Post, Profile, User};
use ripple::security::{jwt, password};

static TEST_KEYS: Lazy<(String, String)> = Lazy::new(|| {
    let mut rng = rand::thread_rng();
    let private = RsaPrivateKey::new(&mut rng, 2048).expect("failed to generate RSA key");
    let public = RsaPublicKey::from(&private);

    (
        private
            .to_pkcs8_pem(LineEnding::LF)
            .expect("encode private key")
            .to_string(),
        public
            .to_public_key_pem(LineEnding::LF)
            .expect("encode public key"),
    )
});

/// Install a process-wide RSA key pair for token generation in tests.
pub fn init_test_keys() {
    jwt::initialize_keys(&TEST_KEYS.0, &TEST_KEYS.1).expect("initialize test JWT keys");
}

pub async fn create_test_pool() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("TEST_DATABASE_URL or DATABASE_URL must be set for db_tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to test database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("run migrations on test database");

    pool
}

pub async fn cleanup_test_data(pool: &PgPool) {
    // Posts cascade to comments and likes; users cascade to everything else.
    sqlx::query("DELETE FROM posts").execute(pool).await.ok();
    sqlx::query("DELETE FROM users").execute(pool).await.ok();
}

pub async fn create_test_user(pool: &PgPool) -> User {
    let email = format!("user-{}@example.com", Uuid::new_v4());
    let hash = password::hash_password("StrongP@ssw0rd!").expect("hash test password");
    user_repo::create_user(pool, &email, &hash)
        .await
        .expect("create test user")
}

pub async fn create_test_admin(pool: &PgPool) -> User {
    let email = format!("admin-{}@example.com", Uuid::new_v4());
    let hash = password::hash_password("StrongP@ssw0rd!").expect("hash test password");
    user_repo::create_admin(pool, &email, &hash)
        .await
        .expect("create test admin")
}

pub async fn create_test_profile(pool: &PgPool, user: &User, username: &str) -> Profile {
    profile_repo::create_profile(pool, user.id, username, "test bio")
        .await
        .expect("create test profile")
}

pub async fn create_test_post(pool: &PgPool, profile: &Profile, title: &str) -> Post {
    post_repo::create_post(pool, title, "Test content", profile.id)
        .await
        .expect("create test post")
}

/// Bearer token for the given user.
pub fn bearer_for(user: &User) -> String {
    let token = jwt::generate_access_token(user.id, &user.email).expect("generate test token");
    format!("Bearer {}", token)
}
