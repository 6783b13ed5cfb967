pub mod admin;

pub use admin::RequireAdmin;
