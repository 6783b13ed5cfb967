pub mod password;
pub mod reset_token;
pub mod totp;

pub use password::{hash_password, verify_password};
pub use reset_token::{generate_token, hash_token};
