//! CLI subcommands.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// `DATABASE_URL`, if set and non-empty.
pub fn database_url() -> Option<SecretString> {
    std::env::var("DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .map(SecretString::from)
}
