//! Shopper language and currency preferences.
//!
//! Both are stored in the session as their codes. Unknown or missing values
//! fall back to Armenian and AMD.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use shop_core::{Currency, Language};

/// Extractor for the current shopper's display preferences.
///
/// Never rejects: without a session the defaults are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub language: Language,
    pub currency: Currency,
}

impl<S> FromRequestParts<S> for Preferences
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self::default());
        };

        let language: Option<String> = session
            .get(Language::STORAGE_KEY)
            .await
            .ok()
            .flatten();
        let currency: Option<String> = session
            .get(Currency::STORAGE_KEY)
            .await
            .ok()
            .flatten();

        Ok(Self {
            language: Language::resolve_stored(language.as_deref()),
            currency: Currency::resolve_stored(currency.as_deref()),
        })
    }
}

/// Store the shopper's language.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_language(
    session: &Session,
    language: Language,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(Language::STORAGE_KEY, language.code()).await
}

/// Store the shopper's currency.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_currency(
    session: &Session,
    currency: Currency,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(Currency::STORAGE_KEY, currency.code()).await
}
