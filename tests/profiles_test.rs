#![cfg(feature = "db_tests")]
/// Integration tests for profile endpoints and the auth gate.
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
    public_read: bool,
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
            .configure(move |cfg| configure_routes(cfg, public_read)),
    )
    .await
}

#[actix_web::test]
#[serial_test::serial]
async fn test_anonymous_list_requires_auth_by_default() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media, false).await;

    let req = test::TestRequest::get().uri("/api/v1/profiles").to_request();
    match test::try_call_service(&app, req).await {
        Ok(resp) => assert_eq!(resp.status(), StatusCode::UNAUTHORIZED),
        Err(e) => assert_eq!(
            e.as_response_error().status_code(),
            StatusCode::UNAUTHORIZED
        ),
    }
}

#[actix_web::test]
#[serial_test::serial]
async fn test_public_read_config_allows_anonymous_list() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media, true).await;

    let req = test::TestRequest::get().uri("/api/v1/profiles").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Writes stay gated even with public reads
    let req = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .set_json(serde_json::json!({"username": "anon", "bio": ""}))
        .to_request();
    match test::try_call_service(&app, req).await {
        Ok(resp) => assert_eq!(resp.status(), StatusCode::UNAUTHORIZED),
        Err(e) => assert_eq!(
            e.as_response_error().status_code(),
            StatusCode::UNAUTHORIZED
        ),
    }
}

#[actix_web::test]
#[serial_test::serial]
async fn test_filter_profiles_by_username() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media, false).await;

    let user1 = fixtures::create_test_user(&pool).await;
    fixtures::create_test_profile(&pool, &user1, "dotcom-alice").await;
    let user2 = fixtures::create_test_user(&pool).await;
    fixtures::create_test_profile(&pool, &user2, "bob").await;

    let req = test::TestRequest::get()
        .uri("/api/v1/profiles?username=DOTCOM")
        .insert_header(("Authorization", fixtures::bearer_for(&user1)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let profiles = body.as_array().expect("array response");
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["username"], "dotcom-alice");

    fixtures::cleanup_test_data(&pool).await;
}

#[actix_web::test]
#[serial_test::serial]
async fn test_one_profile_per_account() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media, false).await;

    let user = fixtures::create_test_user(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .insert_header(("Authorization", fixtures::bearer_for(&user)))
        .set_json(serde_json::json!({"username": "first", "bio": "hi"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .insert_header(("Authorization", fixtures::bearer_for(&user)))
        .set_json(serde_json::json!({"username": "second", "bio": "hi"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    fixtures::cleanup_test_data(&pool).await;
}

#[actix_web::test]
#[serial_test::serial]
async fn test_profile_detail_embeds_account_and_follow_lists() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media, false).await;

    let alice = fixtures::create_test_user(&pool).await;
    let alice_profile = fixtures::create_test_profile(&pool, &alice, "detailed").await;
    let bob = fixtures::create_test_user(&pool).await;

    ripple::db::follow_repo::follow(&pool, bob.id, alice.id)
        .await
        .expect("seed follow");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/profiles/{}", alice_profile.id))
        .insert_header(("Authorization", fixtures::bearer_for(&alice)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "detailed");
    assert_eq!(body["user"]["email"], alice.email);
    assert!(body["user"].get("password_hash").is_none());
    assert_eq!(body["followers"][0], bob.id.to_string());

    fixtures::cleanup_test_data(&pool).await;
}

#[actix_web::test]
#[serial_test::serial]
async fn test_non_owner_profile_update_forbidden() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media, false).await;

    let alice = fixtures::create_test_user(&pool).await;
    let alice_profile = fixtures::create_test_profile(&pool, &alice, "target").await;
    let mallory = fixtures::create_test_user(&pool).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/profiles/{}", alice_profile.id))
        .insert_header(("Authorization", fixtures::bearer_for(&mallory)))
        .set_json(serde_json::json!({"username": "hijacked", "bio": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    fixtures::cleanup_test_data(&pool).await;
}
