#![cfg(feature = "db_tests")]
/// Integration tests for account lifecycle: register, login, refresh, logout.
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
async fn test_register_login_and_refresh_flow() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "email": "flow@example.com",
            "password": "StrongP@ssw0rd!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "flow@example.com");
    assert_eq!(body["is_staff"], false);
    assert!(body.get("password_hash").is_none());

    // Login
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token")
        .set_json(serde_json::json!({
            "email": "flow@example.com",
            "password": "StrongP@ssw0rd!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let tokens: Value = test::read_body_json(resp).await;
    let refresh = tokens["refresh_token"].as_str().unwrap().to_string();
    assert_eq!(tokens["token_type"], "Bearer");

    // Refresh rotates the token
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token/refresh")
        .set_json(serde_json::json!({"refresh_token": refresh}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The old refresh token is revoked after rotation
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token/refresh")
        .set_json(serde_json::json!({"refresh_token": refresh}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    fixtures::cleanup_test_data(&pool).await;
}

#[actix_web::test]
#[serial_test::serial]
async fn test_login_with_wrong_password_rejected() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media).await;

    let user = fixtures::create_test_user(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token")
        .set_json(serde_json::json!({
            "email": user.email,
            "password": "WrongPassword1!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    fixtures::cleanup_test_data(&pool).await;
}

#[actix_web::test]
#[serial_test::serial]
async fn test_duplicate_email_registration_conflicts() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media).await;

    let payload = serde_json::json!({
        "email": "dup@example.com",
        "password": "StrongP@ssw0rd!"
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(payload.clone())
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(payload)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );

    fixtures::cleanup_test_data(&pool).await;
}

#[actix_web::test]
#[serial_test::serial]
async fn test_logout_revokes_refresh_token() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let media = TempDir::new().unwrap();
    let app = setup_test_app(pool.clone(), &media).await;

    let user = fixtures::create_test_user(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token")
        .set_json(serde_json::json!({
            "email": user.email,
            "password": "StrongP@ssw0rd!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tokens: Value = test::read_body_json(resp).await;
    let refresh = tokens["refresh_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(("Authorization", fixtures::bearer_for(&user)))
        .set_json(serde_json::json!({"refresh_token": refresh}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Revoked token can no longer be exchanged
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token/refresh")
        .set_json(serde_json::json!({"refresh_token": tokens["refresh_token"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    fixtures::cleanup_test_data(&pool).await;
}
