//! Admin authentication error types.

use thiserror::Error;

use shop_core::EmailError;

use crate::db::RepositoryError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Account exists but does not hold the admin role.
    #[error("account is not an administrator")]
    NotAdmin,

    /// Account is blocked.
    #[error("account is blocked")]
    Blocked,

    /// Password does not meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Message shown on the login form.
    ///
    /// Unknown accounts and non-admins get the same answer.
    #[must_use]
    pub fn login_message(&self) -> &'static str {
        match self {
            Self::InvalidEmail(_) | Self::InvalidCredentials | Self::NotAdmin => {
                "Invalid email or password"
            }
            Self::Blocked => "This account is blocked",
            Self::WeakPassword(_) | Self::PasswordHash | Self::Repository(_) => {
                "Sign-in failed, please try again"
            }
        }
    }
}
