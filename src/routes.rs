//! Route configuration
//!
//! Centralized route setup; each domain manages its own routes. Scopes that
//! serve reads take the `public_read` flag so deployments can open safe
//! methods to anonymous clients.

use crate::handlers;
use crate::middleware::{JwtAuthMiddleware, MetricsMiddleware};
use actix_web::{web, HttpResponse};

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig, public_read: bool) {
    cfg
        // Static/public endpoints
        .route("/metrics", web::get().to(metrics_handler))
        .route("/api/v1/openapi.json", web::get().to(openapi_handler))
        .route("/api/v1/health", web::get().to(handlers::health_check))
        .route(
            "/api/v1/health/ready",
            web::get().to(handlers::readiness_check),
        )
        .route(
            "/api/v1/health/live",
            web::get().to(handlers::liveness_check),
        )
        // API routes
        .service(
            web::scope("/api/v1")
                .wrap(MetricsMiddleware)
                .configure(routes::auth::configure)
                .configure(routes::users::configure)
                .configure(move |c| routes::profiles::configure(c, public_read))
                .configure(move |c| routes::posts::configure(c, public_read))
                .configure(move |c| routes::comments::configure(c, public_read)),
        );
}

/// Metrics handler
async fn metrics_handler() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(crate::metrics::gather_metrics())
}

/// OpenAPI JSON endpoint
async fn openapi_handler() -> HttpResponse {
    use utoipa::OpenApi;
    HttpResponse::Ok()
        .content_type("application/json")
        .json(crate::openapi::ApiDoc::openapi())
}

// Sub-modules for each domain
mod routes {
    use super::*;

    pub mod auth {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/auth")
                    .route("/register", web::post().to(handlers::register))
                    .route("/token", web::post().to(handlers::login))
                    .route("/token/refresh", web::post().to(handlers::refresh_token))
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware::default())
                            .route("/logout", web::post().to(handlers::logout)),
                    ),
            );
        }
    }

    pub mod users {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/users/me")
                    .wrap(JwtAuthMiddleware::default())
                    .route("", web::get().to(handlers::get_current_user))
                    .route("", web::put().to(handlers::update_current_user)),
            );
        }
    }

    pub mod profiles {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig, public_read: bool) {
            cfg.service(
                web::scope("/profiles")
                    .wrap(JwtAuthMiddleware::new(public_read))
                    .route("", web::get().to(handlers::list_profiles))
                    .route("", web::post().to(handlers::create_profile))
                    .route("/{id}", web::get().to(handlers::get_profile))
                    .route("/{id}", web::put().to(handlers::update_profile))
                    .route(
                        "/{id}/upload-image",
                        web::post().to(handlers::upload_profile_image),
                    )
                    .route("/{id}/follow", web::post().to(handlers::follow_profile))
                    .route("/{id}/unfollow", web::post().to(handlers::unfollow_profile))
                    .route("/{id}/followers", web::get().to(handlers::get_followers))
                    .route("/{id}/following", web::get().to(handlers::get_following)),
            );
        }
    }

    pub mod posts {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig, public_read: bool) {
            cfg.service(
                web::scope("/posts")
                    .wrap(JwtAuthMiddleware::new(public_read))
                    .route("", web::get().to(handlers::list_posts))
                    .route("", web::post().to(handlers::create_post))
                    .route("/{id}", web::get().to(handlers::get_post))
                    .route("/{id}", web::put().to(handlers::update_post))
                    .route("/{id}", web::delete().to(handlers::delete_post))
                    .route(
                        "/{id}/upload-image",
                        web::post().to(handlers::upload_post_image),
                    )
                    .route("/{id}/like", web::post().to(handlers::like_post))
                    .route("/{id}/like", web::delete().to(handlers::unlike_post))
                    .route(
                        "/{id}/like/status",
                        web::get().to(handlers::check_like_status),
                    )
                    .route("/{id}/likes", web::get().to(handlers::get_post_likes)),
            );
        }
    }

    pub mod comments {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig, public_read: bool) {
            cfg.service(
                web::scope("/comments")
                    .wrap(JwtAuthMiddleware::new(public_read))
                    .route("", web::get().to(handlers::list_comments))
                    .route("", web::post().to(handlers::create_comment))
                    .route("/{id}", web::get().to(handlers::get_comment))
                    .route("/{id}", web::put().to(handlers::update_comment))
                    .route("/{id}", web::delete().to(handlers::delete_comment)),
            );
        }
    }
}
