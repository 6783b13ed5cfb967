pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod security;
pub mod services;
pub mod store;

pub use config::Settings;
pub use error::{AuthError, Result};
pub use models::User;

use std::sync::Arc;

use access_control::TokenKeys;
use config::AuthSettings;
use services::{AuthService, TwoFaService};
use store::SharedUserStore;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub two_fa: TwoFaService,
    pub store: SharedUserStore,
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(store: SharedUserStore, tokens: Arc<TokenKeys>, policy: AuthSettings) -> Self {
        Self {
            auth: AuthService::new(store.clone(), tokens.clone(), policy.clone()),
            two_fa: TwoFaService::new(store.clone(), policy.totp_issuer),
            store,
            tokens,
        }
    }
}
