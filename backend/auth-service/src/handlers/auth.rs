/// Authentication handlers
use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::{AuthError, ErrorBody};
use crate::models::user::{
    AuthResponse, ForgotPasswordRequest, LoginMfaRequest, LoginRequest, MessageResponse,
    MfaChallengeResponse, RegisterRequest, ResetPasswordRequest,
};
use crate::services::LoginOutcome;
use crate::AppState;

/// Register endpoint handler
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing fields or duplicate email", body = ErrorBody)
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AuthError> {
    payload.validate()?;

    let (token, role) = state
        .auth
        .register(&payload.email, &payload.password, payload.role)
        .await?;

    Ok(HttpResponse::Created().json(AuthResponse { token, role }))
}

/// Login endpoint handler (password phase)
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued, or an MFA challenge when the account has MFA enabled", body = AuthResponse),
        (status = 400, description = "Invalid credentials", body = ErrorBody),
        (status = 403, description = "Account locked or revoked", body = ErrorBody)
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    match state.auth.login(&payload.email, &payload.password).await? {
        LoginOutcome::Authenticated { token, role } => {
            Ok(HttpResponse::Ok().json(AuthResponse { token, role }))
        }
        LoginOutcome::MfaRequired { user_id } => {
            Ok(HttpResponse::Ok().json(MfaChallengeResponse {
                mfa_required: true,
                user_id,
            }))
        }
    }
}

/// Login MFA exchange handler
#[utoipa::path(
    post,
    path = "/api/auth/login/2fa",
    tag = "Auth",
    request_body = LoginMfaRequest,
    responses(
        (status = 200, description = "Token issued", body = AuthResponse),
        (status = 400, description = "Invalid code", body = ErrorBody),
        (status = 404, description = "Unknown user", body = ErrorBody)
    )
)]
pub async fn login_mfa(
    state: web::Data<AppState>,
    payload: web::Json<LoginMfaRequest>,
) -> Result<HttpResponse, AuthError> {
    let (token, role) = state
        .auth
        .verify_login_mfa(payload.user_id, &payload.code)
        .await?;

    Ok(HttpResponse::Ok().json(AuthResponse { token, role }))
}

/// Forgot-password handler. Responds with the same generic message whether
/// or not the email exists.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Generic acknowledgement, always", body = MessageResponse)
    )
)]
pub async fn forgot_password(
    state: web::Data<AppState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AuthError> {
    state.auth.request_password_reset(&payload.email).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "If an account with this email exists, a reset link has been sent.".to_string(),
    }))
}

/// Reset-password handler (token consumption)
#[utoipa::path(
    post,
    path = "/api/auth/reset-password/{token}",
    tag = "Auth",
    params(
        ("token" = String, Path, description = "Reset token from the emailed link")
    ),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password replaced", body = MessageResponse),
        (status = 400, description = "Token invalid, expired, or already used", body = ErrorBody)
    )
)]
pub async fn reset_password(
    state: web::Data<AppState>,
    token: web::Path<String>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AuthError> {
    payload.validate()?;

    state
        .auth
        .reset_password(&token.into_inner(), &payload.password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Password has been reset successfully.".to_string(),
    }))
}
