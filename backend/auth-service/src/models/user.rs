use access_control::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Account record - the sole core entity.
///
/// All mutation goes through the auth service; concurrent logins racing on
/// the attempt counter are last-write-wins, which is acceptable because the
/// worst outcome is a slightly inaccurate counter.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub failed_login_attempts: i32,
    pub lockout_until: Option<DateTime<Utc>>,
    /// Present once MFA setup has been initiated; enrollment is only
    /// complete when `mfa_enabled` flips true
    pub mfa_secret: Option<String>,
    pub mfa_enabled: bool,
    /// One-way administrative kill switch; blocks login regardless of
    /// lockout or MFA state
    pub is_revoked: bool,
    /// SHA-256 hash of the outstanding reset token; set and cleared
    /// together with `reset_password_expires`
    pub reset_password_token: Option<String>,
    pub reset_password_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            role,
            failed_login_attempts: 0,
            lockout_until: None,
            mfa_secret: None,
            mfa_enabled: false,
            is_revoked: false,
            reset_password_token: None,
            reset_password_expires: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the account is inside a lockout window
    pub fn is_locked(&self) -> bool {
        if let Some(lockout_until) = self.lockout_until {
            lockout_until > Utc::now()
        } else {
            false
        }
    }
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Defaults to the configured role (Organizer) when absent
    pub role: Option<Role>,
}

/// Login request (password phase)
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login MFA exchange: carries the user id returned by the password phase
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginMfaRequest {
    pub user_id: Uuid,
    pub code: String,
}

/// MFA setup confirmation code
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyMfaRequest {
    pub code: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1))]
    pub password: String,
}

/// Successful authentication: bearer token plus the role it embeds
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub role: Role,
}

/// Password phase passed but the account has MFA enabled; the client must
/// complete the `/login/2fa` exchange to obtain a token
#[derive(Debug, Serialize, ToSchema)]
pub struct MfaChallengeResponse {
    pub mfa_required: bool,
    pub user_id: Uuid,
}

/// MFA enrollment payload
#[derive(Debug, Serialize, ToSchema)]
pub struct MfaSetupResponse {
    /// Base32 shared secret (for manual entry)
    pub secret: String,
    /// otpauth:// provisioning URI
    pub otpauth_url: String,
    /// QR rendering of the URI as an SVG data URL
    pub qr_code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Account summary for the admin listing; never carries the credential
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub mfa_enabled: bool,
    pub is_revoked: bool,
    pub failed_login_attempts: i32,
    pub lockout_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            mfa_enabled: user.mfa_enabled,
            is_revoked: user.is_revoked,
            failed_login_attempts: user.failed_login_attempts,
            lockout_until: user.lockout_until,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new(
            "a@x.com".to_string(),
            "hash".to_string(),
            Role::Organizer,
        );
        assert_eq!(user.failed_login_attempts, 0);
        assert!(user.lockout_until.is_none());
        assert!(!user.mfa_enabled);
        assert!(user.mfa_secret.is_none());
        assert!(!user.is_revoked);
        assert!(user.reset_password_token.is_none());
        assert!(user.reset_password_expires.is_none());
    }

    #[test]
    fn test_is_locked() {
        let mut user = User::new("a@x.com".into(), "hash".into(), Role::User);
        assert!(!user.is_locked());

        user.lockout_until = Some(Utc::now() + Duration::minutes(15));
        assert!(user.is_locked());

        user.lockout_until = Some(Utc::now() - Duration::seconds(1));
        assert!(!user.is_locked());
    }

    #[test]
    fn test_summary_has_no_credential() {
        let user = User::new("a@x.com".into(), "hash".into(), Role::Admin);
        let summary = UserSummary::from(&user);
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "Admin");
    }
}
