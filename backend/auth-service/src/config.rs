//! Configuration for the auth service
//!
//! Every tunable the core depends on (lockout policy, token lifetime, reset
//! TTL, default role) lives here and is injected at construction. Business
//! logic never reads the environment; `Settings::from_env` is called exactly
//! once, from `main`.

use access_control::Role;
use anyhow::{Context, Result};
use std::env;

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub auth: AuthSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Ok(Settings {
            server: ServerSettings::from_env()?,
            database: DatabaseSettings::from_env()?,
            jwt: JwtSettings::from_env()?,
            auth: AuthSettings::from_env()?,
        })
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
        })
    }
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: u64,
}

impl DatabaseSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,
            acquire_timeout: env::var("DATABASE_ACQUIRE_TIMEOUT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid DATABASE_ACQUIRE_TIMEOUT")?,
        })
    }
}

/// Bearer token settings
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    /// Token lifetime; expiry is absolute from issuance, no refresh
    pub ttl_seconds: u64,
}

impl JwtSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            ttl_seconds: env::var("JWT_TTL_SECONDS")
                .unwrap_or_else(|_| "18000".to_string())
                .parse()
                .context("Invalid JWT_TTL_SECONDS")?,
        })
    }
}

/// Account-security policy
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Consecutive failed logins before the account is locked
    pub max_failed_logins: i32,
    /// Lockout window applied once the threshold is hit
    pub lockout_seconds: i64,
    /// Lifetime of a password-reset token
    pub reset_token_ttl_seconds: i64,
    /// Role assigned when registration does not request one
    pub default_role: Role,
    /// Issuer label shown in authenticator apps
    pub totp_issuer: String,
    /// Base URL for reset links handed to the delivery collaborator
    pub reset_base_url: String,
}

impl AuthSettings {
    fn from_env() -> Result<Self> {
        let default_role: Role = env::var("AUTH_DEFAULT_ROLE")
            .unwrap_or_else(|_| "Organizer".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid AUTH_DEFAULT_ROLE: {e}"))?;

        Ok(Self {
            max_failed_logins: env::var("AUTH_MAX_FAILED_LOGINS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Invalid AUTH_MAX_FAILED_LOGINS")?,
            lockout_seconds: env::var("AUTH_LOCKOUT_SECONDS")
                .unwrap_or_else(|_| "900".to_string())
                .parse()
                .context("Invalid AUTH_LOCKOUT_SECONDS")?,
            reset_token_ttl_seconds: env::var("AUTH_RESET_TOKEN_TTL_SECONDS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .context("Invalid AUTH_RESET_TOKEN_TTL_SECONDS")?,
            default_role,
            totp_issuer: env::var("AUTH_TOTP_ISSUER").unwrap_or_else(|_| "PledgeHub".to_string()),
            reset_base_url: env::var("AUTH_RESET_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/reset-password".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_settings_defaults() {
        let settings = AuthSettings::from_env().unwrap();

        assert_eq!(settings.max_failed_logins, 5);
        assert_eq!(settings.lockout_seconds, 900);
        assert_eq!(settings.reset_token_ttl_seconds, 3600);
        assert_eq!(settings.default_role, Role::Organizer);
        assert_eq!(settings.totp_issuer, "PledgeHub");
    }

    #[test]
    fn test_jwt_settings_from_env() {
        env::set_var("JWT_SECRET", "test-secret-key");
        env::set_var("JWT_TTL_SECONDS", "7200");

        let settings = JwtSettings::from_env().unwrap();

        assert_eq!(settings.secret, "test-secret-key");
        assert_eq!(settings.ttl_seconds, 7200);

        env::remove_var("JWT_SECRET");
        env::remove_var("JWT_TTL_SECONDS");
    }

    #[test]
    fn test_server_settings_defaults() {
        let settings = ServerSettings::from_env().unwrap();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8080);
    }
}
