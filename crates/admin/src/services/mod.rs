//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Email and password sign-in for administrators
//! - `bulk` - Concurrent best-effort bulk deletes

pub mod auth;
pub mod bulk;

pub use auth::{AdminAuthService, AuthError};
