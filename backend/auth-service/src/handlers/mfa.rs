/// MFA enrollment handlers (authenticated)
use access_control::AuthenticatedUser;
use actix_web::{web, HttpResponse};

use crate::error::{AuthError, ErrorBody};
use crate::models::user::{MessageResponse, MfaSetupResponse, VerifyMfaRequest};
use crate::AppState;

/// Begin MFA enrollment for the authenticated account. Overwrites any
/// previous secret and drops the account back to pending verification.
#[utoipa::path(
    post,
    path = "/api/mfa/setup",
    tag = "MFA",
    responses(
        (status = 200, description = "Enrollment payload", body = MfaSetupResponse),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer_token" = []))
)]
pub async fn setup(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AuthError> {
    let enrollment = state.two_fa.initiate(user.id).await?;

    Ok(HttpResponse::Ok().json(MfaSetupResponse {
        secret: enrollment.secret,
        otpauth_url: enrollment.otpauth_url,
        qr_code: enrollment.qr_code,
    }))
}

/// Complete MFA enrollment by verifying a code from the authenticator app
#[utoipa::path(
    post,
    path = "/api/mfa/verify",
    tag = "MFA",
    request_body = VerifyMfaRequest,
    responses(
        (status = 200, description = "MFA enabled", body = MessageResponse),
        (status = 400, description = "Setup missing or code invalid", body = ErrorBody),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer_token" = []))
)]
pub async fn verify(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<VerifyMfaRequest>,
) -> Result<HttpResponse, AuthError> {
    state.two_fa.confirm(user.id, &payload.code).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "MFA enabled successfully".to_string(),
    }))
}
