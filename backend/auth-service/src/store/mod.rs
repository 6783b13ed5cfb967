//! Account persistence seam.
//!
//! The auth core owns the account record but not its storage: the data layer
//! is an external collaborator reached through [`UserStore`]. The service
//! ships a Postgres implementation; tests run against the in-memory one.

pub mod memory;
pub mod postgres;

use crate::error::Result;
use crate::models::User;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

pub type SharedUserStore = Arc<dyn UserStore>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Look up an account by the hash of an outstanding reset token,
    /// filtered to tokens that have not expired at `now`
    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>>;

    async fn insert(&self, user: User) -> Result<User>;

    /// Persist the full record (read-modify-write; last write wins)
    async fn update(&self, user: &User) -> Result<()>;

    async fn list(&self) -> Result<Vec<User>>;
}
