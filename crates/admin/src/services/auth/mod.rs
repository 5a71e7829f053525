//! Admin authentication service.
//!
//! Email and password sign-in against Argon2id hashes stored on
//! `shop.users.password_hash`. Only active users holding the `admin` role
//! may sign in.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use shop_core::Email;

use crate::db::UserRepository;
use crate::models::{AdminUserRow, CurrentAdmin};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed.
    /// Returns `AuthError::InvalidCredentials` if the user is unknown, has no
    /// password or the password does not match.
    /// Returns `AuthError::NotAdmin` if the user lacks the admin role.
    /// Returns `AuthError::Blocked` if the account is blocked.
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentAdmin, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .find_for_login(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        let password_hash = password_hash.ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;
        check_admin(&user)?;

        Ok(CurrentAdmin {
            id: user.id,
            name: user.display_name(),
            email,
        })
    }
}

/// Reject accounts that may not use the back-office.
fn check_admin(user: &AdminUserRow) -> Result<(), AuthError> {
    if !user.is_admin() {
        return Err(AuthError::NotAdmin);
    }
    if user.blocked {
        return Err(AuthError::Blocked);
    }
    Ok(())
}

/// Check password requirements.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use shop_core::{UserId, UserRole};

    use super::*;

    fn user(roles: Vec<UserRole>, blocked: bool) -> AdminUserRow {
        AdminUserRow {
            id: UserId::generate(),
            email: Some("admin@shop.am".to_string()),
            phone: None,
            first_name: Some("Ani".to_string()),
            last_name: None,
            roles,
            blocked,
            orders_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_garbage_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("anything", "not-a-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_only_active_admins_pass() {
        assert!(check_admin(&user(vec![UserRole::Admin], false)).is_ok());
        assert!(matches!(
            check_admin(&user(vec![UserRole::Customer], false)),
            Err(AuthError::NotAdmin)
        ));
        assert!(matches!(
            check_admin(&user(vec![UserRole::Admin, UserRole::Customer], true)),
            Err(AuthError::Blocked)
        ));
    }

    #[test]
    fn test_login_message_hides_account_state() {
        assert_eq!(
            AuthError::NotAdmin.login_message(),
            AuthError::InvalidCredentials.login_message()
        );
    }
}
