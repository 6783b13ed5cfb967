//! Shared access-control primitives for PledgeHub services.
//!
//! The auth service issues bearer tokens; every other service (events,
//! pledges, reports) only needs to verify them and read the authenticated
//! identity off the request. This crate carries that shared surface:
//!
//! - [`TokenKeys`]: HS256 token issuance and verification with an injected
//!   secret and expiry (no process-global key state, no env reads)
//! - [`RequireAuth`]: actix middleware that turns a `Bearer` header into an
//!   [`AuthenticatedUser`] request extension
//! - [`assert_owner`]: the ownership guard used by resource-mutation routes

pub mod middleware;
pub mod token;

pub use middleware::{assert_owner, AuthenticatedUser, RequireAuth};
pub use token::{Claims, Role, TokenError, TokenKeys};
