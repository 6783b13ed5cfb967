/// Admin authorization gate.
///
/// Runs behind `RequireAuth` and re-reads the account from the store so the
/// decision reflects the account's current role, not the role frozen into
/// the token at issuance.
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use access_control::{AuthenticatedUser, Role};

use crate::error::AuthError;
use crate::AppState;

pub struct RequireAdmin;

impl<S, B> Transform<S, ServiceRequest> for RequireAdmin
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAdminService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(RequireAdminService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireAdminService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAdminService<S>
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

        Box::pin(async move {
            let user = req
                .extensions()
                .get::<AuthenticatedUser>()
                .copied()
                .ok_or_else(|| ErrorUnauthorized("User not authenticated"))?;

            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| {
                    Error::from(AuthError::Internal("AppState missing".to_string()))
                })?;

            let account = state
                .store
                .find_by_id(user.id)
                .await
                .map_err(Error::from)?
                .ok_or_else(|| {
                    // A token for a row that no longer exists is a server-side
                    // inconsistency, not a client error
                    Error::from(AuthError::Internal(format!(
                        "authenticated account {} not found",
                        user.id
                    )))
                })?;

            if account.role != Role::Admin {
                tracing::warn!(user_id = %account.id, "admin access denied");
                return Err(Error::from(AuthError::AdminRequired));
            }

            service.call(req).await
        })
    }
}
