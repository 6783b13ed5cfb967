/// Bearer-token authentication middleware and request identity extractor
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

use crate::token::{Role, TokenKeys};

/// Identity attached to the request once the bearer token checks out
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub role: Role,
}

/// Authentication gate: verifies the `Authorization: Bearer` header and
/// inserts an [`AuthenticatedUser`] into request extensions. Every failure
/// mode (missing header, wrong scheme, bad signature, expired) is a 401.
pub struct RequireAuth {
    keys: Arc<TokenKeys>,
}

impl RequireAuth {
    pub fn new(keys: Arc<TokenKeys>) -> Self {
        Self { keys }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(RequireAuthService {
            service: Rc::new(service),
            keys: self.keys.clone(),
        }))
    }
}

pub struct RequireAuthService<S> {
    service: Rc<S>,
    keys: Arc<TokenKeys>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let keys = self.keys.clone();

        Box::pin(async move {
            // Headers must be read (and copied out) before extensions_mut():
            // both borrow the same RefCell on the request head.
            let auth_header = match req.headers().get("Authorization") {
                Some(header) => match header.to_str() {
                    Ok(h) => h.to_string(),
                    Err(_) => return Err(ErrorUnauthorized("Invalid Authorization header")),
                },
                None => return Err(ErrorUnauthorized("Missing Authorization header")),
            };

            let token = match auth_header.strip_prefix("Bearer ") {
                Some(t) => t,
                None => {
                    return Err(ErrorUnauthorized(
                        "Invalid Authorization scheme, expected Bearer",
                    ))
                }
            };

            let claims = match keys.verify(token) {
                Ok(claims) => claims,
                Err(e) => {
                    tracing::debug!("token validation failed: {}", e);
                    return Err(ErrorUnauthorized("Invalid or expired token"));
                }
            };

            let user_id = match Uuid::parse_str(&claims.sub) {
                Ok(id) => id,
                Err(_) => return Err(ErrorUnauthorized("Invalid user ID in token")),
            };

            req.extensions_mut().insert(AuthenticatedUser {
                id: user_id,
                role: claims.role,
            });

            service.call(req).await
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().copied() {
            Some(user) => ready(Ok(user)),
            None => ready(Err(ErrorUnauthorized("User not authenticated"))),
        }
    }
}

/// Ownership guard for resource mutation: the caller must be the organizer
/// that owns the resource. Violations are reported as 401, matching the
/// platform's existing event routes (role violations elsewhere are 403).
pub fn assert_owner(owner: Uuid, user: &AuthenticatedUser) -> Result<(), Error> {
    if owner == user.id {
        Ok(())
    } else {
        Err(ErrorUnauthorized("User not authorized"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    fn keys() -> Arc<TokenKeys> {
        Arc::new(TokenKeys::new("middleware-test-secret", 3600))
    }

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({
            "id": user.id,
            "role": user.role,
        }))
    }

    #[actix_web::test]
    async fn test_rejects_missing_header() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(RequireAuth::new(keys()))
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/me").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 401);
    }

    #[actix_web::test]
    async fn test_rejects_malformed_scheme_and_bad_token() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(RequireAuth::new(keys()))
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", "Token abc"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", "Bearer not.a.token"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);
    }

    #[actix_web::test]
    async fn test_attaches_identity_on_valid_token() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id, Role::Organizer).unwrap();

        let app = test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(RequireAuth::new(keys.clone()))
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], user_id.to_string());
        assert_eq!(body["role"], "Organizer");
    }

    #[::core::prelude::v1::test]
    fn test_assert_owner() {
        let id = Uuid::new_v4();
        let user = AuthenticatedUser {
            id,
            role: Role::Organizer,
        };

        assert!(assert_owner(id, &user).is_ok());

        let err = assert_owner(Uuid::new_v4(), &user).unwrap_err();
        assert_eq!(
            err.as_response_error().status_code(),
            actix_web::http::StatusCode::UNAUTHORIZED
        );
    }
}
