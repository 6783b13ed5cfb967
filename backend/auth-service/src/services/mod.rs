pub mod auth;
pub mod two_fa;

pub use auth::{AuthService, LoginOutcome};
pub use two_fa::{MfaEnrollment, TwoFaService};
