//! Language and currency switchers.

use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shop_core::{Currency, Language};

use crate::error::{AppError, Result};
use crate::middleware::{set_currency, set_language};
use crate::state::AppState;

/// Switcher form body.
#[derive(Debug, Deserialize)]
pub struct PreferenceForm {
    pub code: String,
}

/// Store the shopper's language and go back.
///
/// # Errors
///
/// Returns 400 for unknown language codes.
#[instrument(skip(state, session, headers))]
pub async fn update_language(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<PreferenceForm>,
) -> Result<Redirect> {
    let language: Language = form
        .code
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unsupported language: {}", form.code)))?;

    set_language(&session, language)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    tracing::info!(language = %language, "Language preference updated");

    Ok(Redirect::to(&back_path(&headers, &state.config().base_url)))
}

/// Store the shopper's currency and go back.
///
/// # Errors
///
/// Returns 400 for unknown currency codes.
#[instrument(skip(state, session, headers))]
pub async fn update_currency(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<PreferenceForm>,
) -> Result<Redirect> {
    let currency: Currency = form
        .code
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unsupported currency: {}", form.code)))?;

    set_currency(&session, currency)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    tracing::info!(currency = %currency, "Currency preference updated");

    Ok(Redirect::to(&back_path(&headers, &state.config().base_url)))
}

/// Path of the page the form was posted from, or `/` when the referer is
/// missing or points to another site.
fn back_path(headers: &HeaderMap, base_url: &str) -> String {
    let Some(referer) = headers.get(header::REFERER).and_then(|v| v.to_str().ok()) else {
        return "/".to_string();
    };

    let base = base_url.trim_end_matches('/');
    let path = referer.strip_prefix(base).unwrap_or(referer);
    if path.starts_with('/') && !path.starts_with("//") {
        path.to_string()
    } else {
        "/".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn referer(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::REFERER, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_back_to_same_site_page() {
        let headers = referer("https://shop.am/products?page=2&colors=red");
        assert_eq!(
            back_path(&headers, "https://shop.am"),
            "/products?page=2&colors=red"
        );
    }

    #[test]
    fn test_foreign_referer_goes_home() {
        let headers = referer("https://evil.example/phish");
        assert_eq!(back_path(&headers, "https://shop.am"), "/");
        let headers = referer("//evil.example/phish");
        assert_eq!(back_path(&headers, "https://shop.am"), "/");
    }

    #[test]
    fn test_missing_referer_goes_home() {
        assert_eq!(back_path(&HeaderMap::new(), "https://shop.am/"), "/");
    }
}
