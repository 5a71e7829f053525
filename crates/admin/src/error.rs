//! Unified error handling for admin.
//!
//! Page handlers return `Result<T, AppError>`. JSON API handlers attach the
//! request URL with [`AppError::at`] and render `application/problem+json`.

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

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

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
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to clients.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::BadRequest(msg) => msg.clone(),
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
                "Admin request error"
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

impl ProblemInstance {
    /// Build an instance URL from the admin base URL and a request URI.
    #[must_use]
    pub fn from_uri(base_url: &str, uri: &axum::http::Uri) -> Self {
        let path = uri
            .path_and_query()
            .map_or_else(|| uri.path().to_string(), ToString::to_string);
        Self(format!("{}{path}", base_url.trim_end_matches('/')))
    }
}

impl FromRequestParts<AppState> for ProblemInstance {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(Self::from_uri(&state.config().base_url, original_uri(parts)))
    }
}

/// Request URI as the client sent it; nested routers strip their prefix
/// from `parts.uri`.
pub fn original_uri(parts: &Parts) -> &axum::http::Uri {
    parts
        .extensions
        .get::<OriginalUri>()
        .map_or(&parts.uri, |original| &original.0)
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

// =============================================================================
// Sentry
// =============================================================================

/// Set the Sentry user context from the signed-in admin.
pub fn set_sentry_user(admin_id: &shop_core::UserId, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order-123".to_string());
        assert_eq!(err.to_string(), "Not found: order-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Database(RepositoryError::DataCorruption("bad role".to_string()));
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_problem_names_request_url() {
        let uri: axum::http::Uri = "/api/v1/admin/users/42?x=1".parse().unwrap();
        let instance = ProblemInstance::from_uri("https://admin.shop.am/", &uri);
        let problem = AppError::NotFound("User not found".to_string())
            .at(&instance)
            .problem();

        assert_eq!(problem.status, 404);
        assert_eq!(problem.detail, "User not found");
        assert_eq!(problem.instance, "https://admin.shop.am/api/v1/admin/users/42?x=1");
        assert!(problem.kind.ends_with("/not-found"));
    }
}
