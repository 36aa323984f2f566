//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Shared-password verification

pub mod auth;

pub use auth::PasswordVerifier;
