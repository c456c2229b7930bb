//! Auth domain - staff identity with password + TOTP
//!
//! Responsibilities:
//! - Registration (bcrypt hash, TOTP secret, provisioning URI)
//! - Login (password check, TOTP check, bearer token issuance)
//! - JWT creation and verification

pub mod actions;
pub mod jwt;
pub mod models;
pub mod password;
pub mod totp;

pub use jwt::{Claims, JwtService};
pub use models::User;
pub use password::PasswordHasher;
