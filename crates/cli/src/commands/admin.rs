//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! shop-cli admin create -e admin@example.com -p 'long-password' --first-name Ani --last-name Petrosyan
//! ```
//!
//! An existing user with the same email is promoted: the `admin` role is
//! added, the password replaced and the account unblocked.

use thiserror::Error;

use shop_admin::db::{self, RepositoryError, UserRepository, users::AdminUpsert};
use shop_admin::services::auth::{AuthError, hash_password, validate_password};
use shop_core::{Email, EmailError, UserId};

use super::database_url;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("{0}")]
    Password(#[from] AuthError),

    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Create an admin user, or promote the existing user with this email.
///
/// Input is validated before connecting to the database.
///
/// # Errors
///
/// Returns an error for an invalid email or weak password, a missing
/// `DATABASE_URL`, or a failed query.
pub async fn create_user(
    email: &str,
    password: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<UserId, AdminError> {
    let email = Email::parse(email)?;
    validate_password(password)?;
    let password_hash = hash_password(password)?;

    let database_url = database_url().ok_or(AdminError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    let outcome = UserRepository::new(&pool)
        .upsert_admin(
            &email,
            &password_hash,
            trimmed(first_name),
            trimmed(last_name),
        )
        .await?;

    let id = match outcome {
        AdminUpsert::Created(id) => {
            tracing::info!(user_id = %id, email = %email, "Admin user created");
            id
        }
        AdminUpsert::Promoted(id) => {
            tracing::info!(user_id = %id, email = %email, "Existing user promoted to admin");
            id
        }
    };

    Ok(id)
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_input_rejected_before_connecting() {
        let err = create_user("not-an-email", "long-enough-password", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::InvalidEmail(_)));

        let err = create_user("admin@shop.am", "short", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Password(AuthError::WeakPassword(_))));
    }

    #[test]
    fn test_blank_names_dropped() {
        assert_eq!(trimmed(Some("  Ani ")), Some("Ani"));
        assert_eq!(trimmed(Some("   ")), None);
        assert_eq!(trimmed(None), None);
    }
}
