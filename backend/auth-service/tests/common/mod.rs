//! Shared fixtures for integration tests: an app state wired to the
//! in-memory store, so every flow runs without external services.

use std::sync::Arc;

use access_control::{Role, TokenKeys};
use auth_service::config::AuthSettings;
use auth_service::store::{InMemoryUserStore, SharedUserStore};
use auth_service::AppState;

pub fn test_policy() -> AuthSettings {
    AuthSettings {
        max_failed_logins: 5,
        lockout_seconds: 900,
        reset_token_ttl_seconds: 3600,
        default_role: Role::Organizer,
        totp_issuer: "PledgeHub".to_string(),
        reset_base_url: "http://localhost:3000/reset-password".to_string(),
    }
}

pub fn test_state() -> AppState {
    let store: SharedUserStore = Arc::new(InMemoryUserStore::new());
    let tokens = Arc::new(TokenKeys::new("integration-test-secret", 18_000));
    AppState::new(store, tokens, test_policy())
}
