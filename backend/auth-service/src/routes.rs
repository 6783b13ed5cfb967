//! Route configuration
//!
//! Centralized route setup so `main` and the test harness build the exact
//! same surface.

use actix_web::{web, HttpResponse};
use utoipa::OpenApi;

use crate::handlers;
use crate::middleware::RequireAdmin;
use crate::AppState;

use access_control::RequireAuth;

/// Configure all routes for the application
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg
        // Public endpoints
        .route("/health", web::get().to(health_handler))
        .route("/api/docs/openapi.json", web::get().to(openapi_handler))
        .service(
            web::scope("/api/auth")
                .route("/register", web::post().to(handlers::auth::register))
                .route("/login", web::post().to(handlers::auth::login))
                .route("/login/2fa", web::post().to(handlers::auth::login_mfa))
                .route(
                    "/forgot-password",
                    web::post().to(handlers::auth::forgot_password),
                )
                .route(
                    "/reset-password/{token}",
                    web::post().to(handlers::auth::reset_password),
                ),
        )
        // Authenticated endpoints
        .service(
            web::scope("/api/mfa")
                .wrap(RequireAuth::new(state.tokens.clone()))
                .route("/setup", web::post().to(handlers::mfa::setup))
                .route("/verify", web::post().to(handlers::mfa::verify)),
        )
        // Admin-only endpoints; wraps run bottom-up, so RequireAuth
        // authenticates before RequireAdmin checks the current role
        .service(
            web::scope("/api/admin")
                .wrap(RequireAdmin)
                .wrap(RequireAuth::new(state.tokens.clone()))
                .route("/users", web::get().to(handlers::admin::list_users))
                .route(
                    "/users/{id}/revoke",
                    web::post().to(handlers::admin::revoke_user),
                ),
        );
}

async fn health_handler() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "auth-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn openapi_handler() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .json(crate::openapi::ApiDoc::openapi())
}
