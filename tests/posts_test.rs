#![cfg(feature = "db_tests")]
/// Integration tests for post endpoints: auth gating, filters, ownership.
mod common;

use actix_web::{http::StatusCode, test, web, App};
use serde_json::Value;
use sqlx::PgPool;
use tempfile::TempDir;

use common::fixtures;
use ripple::routes::configure_routes;
use ripple::services::MediaStorage;

async fn setup_test_app(
    pool: PgPool,
    media_root: &TempDir,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    fixtures::init_test_keys();

    let storage = MediaStorage::new(media_root.path());
    storage.ensure_dirs().expect("create media dirs");

    test::init_service(
        App::new()
            .app_data(web::Data::new(pool))
            .app_data(web::Data::new(storage))
            .configure(|cfg| configure_routes(cfg, false)),
    )
    .await
}

#[actix_web::test]
#[serial_test::serial]
async fn test_anonymous_list_requires_auth() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media).await;

    let req = test::TestRequest::get().uri("/api/v1/posts").to_request();
    let resp = test::try_call_service(&app, req).await;

    match resp {
        Ok(resp) => assert_eq!(resp.status(), StatusCode::UNAUTHORIZED),
        Err(e) => assert_eq!(
            e.as_response_error().status_code(),
            StatusCode::UNAUTHORIZED
        ),
    }
}

#[actix_web::test]
#[serial_test::serial]
async fn test_filter_posts_by_title() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media).await;

    let user = fixtures::create_test_user(&pool).await;
    let profile = fixtures::create_test_profile(&pool, &user, "alice").await;
    fixtures::create_test_post(&pool, &profile, "hello world").await;
    fixtures::create_test_post(&pool, &profile, "other things").await;

    // Substring match, case-insensitive
    let req = test::TestRequest::get()
        .uri("/api/v1/posts?title=HEL")
        .insert_header(("Authorization", fixtures::bearer_for(&user)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let posts = body.as_array().expect("array response");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["title"], "hello world");
    assert_eq!(posts[0]["author"], "alice");

    // No match
    let req = test::TestRequest::get()
        .uri("/api/v1/posts?title=zzz")
        .insert_header(("Authorization", fixtures::bearer_for(&user)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert!(body.as_array().expect("array response").is_empty());

    fixtures::cleanup_test_data(&pool).await;
}

#[actix_web::test]
#[serial_test::serial]
async fn test_filters_combine_conjunctively() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media).await;

    let user1 = fixtures::create_test_user(&pool).await;
    let author1 = fixtures::create_test_profile(&pool, &user1, "black-user").await;
    let user2 = fixtures::create_test_user(&pool).await;
    let author2 = fixtures::create_test_profile(&pool, &user2, "white-user").await;

    fixtures::create_test_post(&pool, &author1, "shared title").await;
    fixtures::create_test_post(&pool, &author2, "shared title").await;

    let req = test::TestRequest::get()
        .uri("/api/v1/posts?title=shared&author=black")
        .insert_header(("Authorization", fixtures::bearer_for(&user1)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let posts = body.as_array().expect("array response");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["author"], "black-user");

    fixtures::cleanup_test_data(&pool).await;
}

#[actix_web::test]
#[serial_test::serial]
async fn test_non_owner_update_forbidden() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media).await;

    let owner = fixtures::create_test_user(&pool).await;
    let author = fixtures::create_test_profile(&pool, &owner, "owner").await;
    let post = fixtures::create_test_post(&pool, &author, "mine").await;

    let intruder = fixtures::create_test_user(&pool).await;
    fixtures::create_test_profile(&pool, &intruder, "intruder").await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/posts/{}", post.id))
        .insert_header(("Authorization", fixtures::bearer_for(&intruder)))
        .set_json(serde_json::json!({"title": "stolen", "content": "nope"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    fixtures::cleanup_test_data(&pool).await;
}

#[actix_web::test]
#[serial_test::serial]
async fn test_admin_can_update_any_post() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media).await;

    let owner = fixtures::create_test_user(&pool).await;
    let author = fixtures::create_test_profile(&pool, &owner, "owner2").await;
    let post = fixtures::create_test_post(&pool, &author, "original").await;

    let admin = fixtures::create_test_admin(&pool).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/posts/{}", post.id))
        .insert_header(("Authorization", fixtures::bearer_for(&admin)))
        .set_json(serde_json::json!({"title": "moderated", "content": "edited"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "moderated");

    fixtures::cleanup_test_data(&pool).await;
}

#[actix_web::test]
#[serial_test::serial]
async fn test_delete_post_cascades_comments_and_likes() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media).await;

    let user = fixtures::create_test_user(&pool).await;
    let profile = fixtures::create_test_profile(&pool, &user, "cascade").await;
    let post = fixtures::create_test_post(&pool, &profile, "short lived").await;

    ripple::db::comment_repo::create_comment(&pool, post.id, profile.id, "first!")
        .await
        .expect("create comment");
    ripple::db::like_repo::create_like(&pool, post.id, user.id)
        .await
        .expect("create like");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/posts/{}", post.id))
        .insert_header(("Authorization", fixtures::bearer_for(&user)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let comments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
        .bind(post.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let likes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE post_id = $1")
        .bind(post.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(comments, 0);
    assert_eq!(likes, 0);

    fixtures::cleanup_test_data(&pool).await;
}
