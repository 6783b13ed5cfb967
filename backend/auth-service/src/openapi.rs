/// OpenAPI documentation for the auth service
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ErrorBody;
use crate::models::user::{
    AuthResponse, ForgotPasswordRequest, LoginMfaRequest, LoginRequest, MessageResponse,
    MfaChallengeResponse, MfaSetupResponse, RegisterRequest, ResetPasswordRequest,
    UserSummary, VerifyMfaRequest,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PledgeHub Auth Service API",
        version = "0.1.0",
        description = "Account registration, login with lockout, TOTP MFA, password reset, and role-gated administration",
    ),
    paths(
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::login_mfa,
        crate::handlers::auth::forgot_password,
        crate::handlers::auth::reset_password,
        crate::handlers::mfa::setup,
        crate::handlers::mfa::verify,
        crate::handlers::admin::list_users,
        crate::handlers::admin::revoke_user,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        LoginMfaRequest,
        ForgotPasswordRequest,
        ResetPasswordRequest,
        VerifyMfaRequest,
        AuthResponse,
        MfaChallengeResponse,
        MfaSetupResponse,
        MessageResponse,
        UserSummary,
        ErrorBody,
        access_control::Role,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login, and password reset"),
        (name = "MFA", description = "TOTP enrollment and verification"),
        (name = "Admin", description = "Account administration"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
