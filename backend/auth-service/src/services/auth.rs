//! Credential, lockout, and reset-flow orchestration.
//!
//! Every operation here is one bounded unit of work against the account
//! store: look up one record, mutate it, persist it. Sequencing inside
//! `login` is load-bearing: revocation is checked before lockout, lockout
//! before the password, and the MFA gate only after a successful password
//! check has reset the counters.

use access_control::{Role, TokenKeys};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AuthSettings;
use crate::error::{AuthError, Result};
use crate::models::User;
use crate::security::{self, password, reset_token};
use crate::store::SharedUserStore;

#[derive(Clone)]
pub struct AuthService {
    store: SharedUserStore,
    tokens: Arc<TokenKeys>,
    policy: AuthSettings,
}

/// Result of the password phase of login
pub enum LoginOutcome {
    /// Credential issued; MFA not enabled on the account
    Authenticated { token: String, role: Role },
    /// Password accepted but the account requires the `/login/2fa` exchange
    MfaRequired { user_id: Uuid },
}

impl AuthService {
    pub fn new(store: SharedUserStore, tokens: Arc<TokenKeys>, policy: AuthSettings) -> Self {
        Self {
            store,
            tokens,
            policy,
        }
    }

    /// Register a new account and issue its first bearer token
    pub async fn register(
        &self,
        email: &str,
        password_plain: &str,
        role: Option<Role>,
    ) -> Result<(String, Role)> {
        if self.store.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let role = role.unwrap_or(self.policy.default_role);
        let password_hash = password::hash_password(password_plain)?;
        let user = self
            .store
            .insert(User::new(email.to_string(), password_hash, role))
            .await?;

        tracing::info!(user_id = %user.id, %email, "new user registered");

        let token = self.tokens.issue(user.id, user.role)?;
        Ok((token, user.role))
    }

    /// Password phase of login.
    ///
    /// Unknown email and wrong password are deliberately indistinguishable;
    /// revoked and locked accounts are not, which is the platform's current
    /// (inconsistent) enumeration posture.
    pub async fn login(&self, email: &str, password_plain: &str) -> Result<LoginOutcome> {
        let mut user = match self.store.find_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::warn!(%email, "failed login attempt: user not found");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if user.is_revoked {
            tracing::warn!(user_id = %user.id, "login denied: account revoked");
            return Err(AuthError::AccountRevoked);
        }

        // An attempt against a locked account does not extend the window
        if user.is_locked() {
            tracing::warn!(user_id = %user.id, "failed login attempt: account locked");
            return Err(AuthError::AccountLocked);
        }

        if !password::verify_password(password_plain, &user.password_hash)? {
            user.failed_login_attempts += 1;
            if user.failed_login_attempts >= self.policy.max_failed_logins {
                user.lockout_until =
                    Some(Utc::now() + Duration::seconds(self.policy.lockout_seconds));
            }
            user.updated_at = Utc::now();
            self.store.update(&user).await?;

            tracing::warn!(
                user_id = %user.id,
                attempts = user.failed_login_attempts,
                "failed login attempt: invalid password"
            );
            return Err(AuthError::InvalidCredentials);
        }

        user.failed_login_attempts = 0;
        user.lockout_until = None;
        user.updated_at = Utc::now();
        self.store.update(&user).await?;

        if user.mfa_enabled {
            tracing::info!(user_id = %user.id, "MFA required for login");
            return Ok(LoginOutcome::MfaRequired { user_id: user.id });
        }

        tracing::info!(user_id = %user.id, "successful login");

        let token = self.tokens.issue(user.id, user.role)?;
        Ok(LoginOutcome::Authenticated {
            token,
            role: user.role,
        })
    }

    /// Second phase of login for MFA-enabled accounts.
    ///
    /// No attempt counter applies to this step.
    pub async fn verify_login_mfa(&self, user_id: Uuid, code: &str) -> Result<(String, Role)> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let secret = match user.mfa_secret.as_deref() {
            Some(secret) => secret,
            None => return Err(AuthError::InvalidMfaCode),
        };

        if !security::totp::verify_code(secret, code)? {
            tracing::warn!(user_id = %user.id, "MFA login failed: invalid code");
            return Err(AuthError::InvalidMfaCode);
        }

        tracing::info!(user_id = %user.id, "successful MFA login");

        let token = self.tokens.issue(user.id, user.role)?;
        Ok((token, user.role))
    }

    /// Generate and record a reset token. Enumeration-safe: callers return
    /// the same generic message whether or not the account exists. A new
    /// request supersedes any outstanding token.
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let mut user = match self.store.find_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::warn!(%email, "password reset requested for unknown email");
                return Ok(());
            }
        };

        let token = reset_token::generate_token();
        user.reset_password_token = Some(reset_token::hash_token(&token));
        user.reset_password_expires =
            Some(Utc::now() + Duration::seconds(self.policy.reset_token_ttl_seconds));
        user.updated_at = Utc::now();
        self.store.update(&user).await?;

        // Delivery is an external collaborator; surface the link in the log
        // the way the mock mailer does
        tracing::info!(
            user_id = %user.id,
            reset_link = %format!("{}/{}", self.policy.reset_base_url, token),
            "password reset link generated"
        );

        Ok(())
    }

    /// Consume a reset token: overwrite the credential and clear both token
    /// fields together, making the token single-use.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let token_hash = reset_token::hash_token(token);
        let mut user = self
            .store
            .find_by_reset_token(&token_hash, Utc::now())
            .await?
            .ok_or_else(|| {
                tracing::warn!("password reset failed: token is invalid or expired");
                AuthError::InvalidResetToken
            })?;

        user.password_hash = password::hash_password(new_password)?;
        user.reset_password_token = None;
        user.reset_password_expires = None;
        user.updated_at = Utc::now();
        self.store.update(&user).await?;

        tracing::info!(user_id = %user.id, "password successfully reset");
        Ok(())
    }

    /// Administrative one-way revocation. Tokens already issued stay valid
    /// until they expire; only new logins are blocked.
    pub async fn revoke(&self, admin_id: Uuid, user_id: Uuid) -> Result<()> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        user.is_revoked = true;
        user.updated_at = Utc::now();
        self.store.update(&user).await?;

        tracing::info!(admin_id = %admin_id, user_id = %user.id, "user access revoked");
        Ok(())
    }

    pub async fn list_accounts(&self) -> Result<Vec<User>> {
        self.store.list().await
    }
}
