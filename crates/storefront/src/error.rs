//! Unified error handling with Sentry integration.
//!
//! Page handlers return `Result<T, AppError>`, which renders a plain status
//! response. JSON API handlers return `Result<T, ApiError>`, which renders an
//! RFC 7807 `application/problem+json` body naming the request URL.

use axum::{
    Json,
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use shop_core::ProblemDetails;

use crate::db::RepositoryError;
use crate::state::AppState;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to clients.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
        }
    }

    /// Attach the request URL so the error renders as problem details.
    #[must_use]
    pub fn at(self, instance: &ProblemInstance) -> ApiError {
        ApiError {
            error: self,
            instance: instance.0.clone(),
        }
    }

    fn capture(&self) {
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.capture();
        (self.status(), self.public_message()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

// =============================================================================
// Problem Details
// =============================================================================

/// The full URL of the current request, used as the problem `instance`.
#[derive(Debug, Clone)]
pub struct ProblemInstance(pub String);

impl FromRequestParts<AppState> for ProblemInstance {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        // Nested routers see the URI with their prefix stripped.
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map_or(&parts.uri, |original| &original.0);
        let path = uri
            .path_and_query()
            .map_or_else(|| uri.path().to_string(), ToString::to_string);
        let base = state.config().base_url.trim_end_matches('/');
        Ok(Self(format!("{base}{path}")))
    }
}

/// An `AppError` rendered as problem details.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    instance: String,
}

impl ApiError {
    /// The problem body this error renders.
    #[must_use]
    pub fn problem(&self) -> ProblemDetails {
        ProblemDetails::new(
            self.error.status().as_u16(),
            self.error.public_message(),
            self.instance.clone(),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.error.capture();
        let problem = self.problem();
        (
            self.error.status(),
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(problem),
        )
            .into_response()
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Add a breadcrumb for storefront activity.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    });
}
