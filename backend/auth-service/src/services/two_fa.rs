//! MFA enrollment state machine: NoMfa -> PendingVerification -> Enabled.
//!
//! `initiate` always writes a fresh secret with `mfa_enabled = false`, so
//! repeating setup (even from Enabled) drops back to pending and silently
//! discards the previous secret. Only `confirm` with a valid code flips the
//! account to Enabled.

use crate::error::{AuthError, Result};
use crate::security::totp;
use crate::store::SharedUserStore;
use uuid::Uuid;

#[derive(Clone)]
pub struct TwoFaService {
    store: SharedUserStore,
    issuer: String,
}

/// Response payload for initiating MFA setup
pub struct MfaEnrollment {
    pub secret: String,
    pub otpauth_url: String,
    pub qr_code: String,
}

impl TwoFaService {
    pub fn new(store: SharedUserStore, issuer: String) -> Self {
        Self { store, issuer }
    }

    /// Begin TOTP enrollment: generate a secret, store it unverified, and
    /// return the scannable payload
    pub async fn initiate(&self, user_id: Uuid) -> Result<MfaEnrollment> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let secret = totp::generate_secret();
        let otpauth_url = totp::provisioning_uri(&self.issuer, &user.email, &secret);
        let qr_code = totp::qr_code_data_url(&otpauth_url)?;

        user.mfa_secret = Some(secret.clone());
        user.mfa_enabled = false;
        user.updated_at = chrono::Utc::now();
        self.store.update(&user).await?;

        tracing::info!(user_id = %user.id, "MFA setup initiated");

        Ok(MfaEnrollment {
            secret,
            otpauth_url,
            qr_code,
        })
    }

    /// Complete enrollment by verifying a code from the authenticator app
    pub async fn confirm(&self, user_id: Uuid, code: &str) -> Result<()> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let secret = user.mfa_secret.clone().ok_or(AuthError::MfaNotSetup)?;

        if !totp::verify_code(&secret, code)? {
            tracing::warn!(user_id = %user.id, "MFA verification failed");
            return Err(AuthError::InvalidMfaCode);
        }

        user.mfa_enabled = true;
        user.updated_at = chrono::Utc::now();
        self.store.update(&user).await?;

        tracing::info!(user_id = %user.id, "MFA enabled");
        Ok(())
    }
}
