//! Database migration commands.
//!
//! Migrations live in `migrations/` at the workspace root and are embedded
//! into the binary at compile time.

use thiserror::Error;

use shop_admin::db;

use super::database_url;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Connect with `DATABASE_URL` and apply pending migrations.
///
/// # Errors
///
/// Fails when `DATABASE_URL` is unset, the database is unreachable or a
/// migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url().ok_or(MigrationError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../../migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}

/// Best-effort migration for build and deploy hooks.
///
/// Without a database nothing happens; a failed run only logs a warning.
pub async fn check_and_migrate() {
    if database_url().is_none() {
        tracing::warn!("DATABASE_URL not set, skipping migrations");
        return;
    }

    if let Err(e) = run().await {
        tracing::warn!(error = %e, "Migrations failed, continuing");
    }
}
