use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    /// Deliberately covers both "no such user" and "wrong password" so the
    /// status code alone cannot be used to enumerate accounts
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account locked. Try again later.")]
    AccountLocked,

    #[error("Your account access has been revoked.")]
    AccountRevoked,

    #[error("User already exists")]
    EmailAlreadyExists,

    #[error("MFA not set up. Please set up first.")]
    MfaNotSetup,

    #[error("Invalid token, verification failed")]
    InvalidMfaCode,

    #[error("Password reset token is invalid or has expired.")]
    InvalidResetToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Access denied. Admin role required.")]
    AdminRequired,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Token error: {0}")]
    Token(#[from] access_control::TokenError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Wire shape for every error body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl AuthError {
    fn error_code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::AccountLocked => "ACCOUNT_LOCKED",
            AuthError::AccountRevoked => "ACCOUNT_REVOKED",
            AuthError::EmailAlreadyExists => "USER_EXISTS",
            AuthError::MfaNotSetup => "MFA_NOT_SETUP",
            AuthError::InvalidMfaCode => "INVALID_MFA_CODE",
            AuthError::InvalidResetToken => "INVALID_RESET_TOKEN",
            AuthError::UserNotFound => "NOT_FOUND",
            AuthError::AdminRequired => "ADMIN_REQUIRED",
            AuthError::Database(_) | AuthError::Token(_) | AuthError::Internal(_) => {
                "INTERNAL_ERROR"
            }
        }
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_)
            | AuthError::InvalidCredentials
            | AuthError::EmailAlreadyExists
            | AuthError::MfaNotSetup
            | AuthError::InvalidMfaCode
            | AuthError::InvalidResetToken => StatusCode::BAD_REQUEST,
            AuthError::AccountLocked | AuthError::AccountRevoked | AuthError::AdminRequired => {
                StatusCode::FORBIDDEN
            }
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Database(_) | AuthError::Token(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Store and crypto failures surface as a bare 500; the detail stays
        // in the logs
        let message = match self {
            AuthError::Database(e) => {
                tracing::error!("database error: {}", e);
                "Server error".to_string()
            }
            AuthError::Token(e) => {
                tracing::error!("token error: {}", e);
                "Server error".to_string()
            }
            AuthError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                "Server error".to_string()
            }
            AuthError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.error_code().to_string(),
            message,
        })
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(_: validator::ValidationErrors) -> Self {
        AuthError::Validation("Please enter all fields".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_taxonomy() {
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::EmailAlreadyExists.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::AccountLocked.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::AccountRevoked.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AuthError::AdminRequired.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let res = AuthError::Internal("connection string with password".into()).error_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Body is rendered lazily; the message passed to it is sanitized above.
    }
}
