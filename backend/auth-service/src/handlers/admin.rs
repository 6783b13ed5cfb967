/// Administrative handlers (authenticated + admin role)
use access_control::AuthenticatedUser;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::{AuthError, ErrorBody};
use crate::models::user::{MessageResponse, UserSummary};
use crate::AppState;

/// List all accounts. The credential never leaves the service.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    responses(
        (status = 200, description = "Account summaries", body = [UserSummary]),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Caller is not an admin", body = ErrorBody)
    ),
    security(("bearer_token" = []))
)]
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, AuthError> {
    let users = state.auth.list_accounts().await?;
    let summaries: Vec<UserSummary> = users.iter().map(UserSummary::from).collect();

    Ok(HttpResponse::Ok().json(summaries))
}

/// Revoke an account's access. One-way: no endpoint clears the flag, and
/// tokens already issued stay valid until they expire.
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/revoke",
    tag = "Admin",
    params(
        ("id" = Uuid, Path, description = "Account to revoke")
    ),
    responses(
        (status = 200, description = "Access revoked", body = MessageResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorBody),
        (status = 404, description = "Unknown account", body = ErrorBody)
    ),
    security(("bearer_token" = []))
)]
pub async fn revoke_user(
    state: web::Data<AppState>,
    admin: AuthenticatedUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AuthError> {
    state.auth.revoke(admin.id, id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "User access revoked".to_string(),
    }))
}
