//! Admin JSON API under `/api/v1/admin`.
//!
//! Every endpoint requires an admin session; errors are RFC 7807 problem
//! details naming the request URL.

pub mod orders;
pub mod users;

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    routing::{get, post, put},
};
use serde::Deserialize;

use crate::error::{ApiError, AppError, ProblemInstance};
use crate::state::AppState;

/// Create the `/api/v1/admin` router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list))
        .route("/users/bulk-delete", post(users::bulk_delete))
        .route("/users/{id}", put(users::update).delete(users::delete))
        .route("/orders", get(orders::list))
        .route("/orders/bulk-delete", post(orders::bulk_delete))
        .route(
            "/orders/{id}",
            get(orders::show).put(orders::update).delete(orders::delete),
        )
}

/// Query parameters shared by the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

/// Body of the bulk-delete endpoints.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest<Id> {
    pub ids: Vec<Id>,
}

/// Unwrap a JSON body, turning rejections into 400 problems.
pub fn json_body<T>(
    body: Result<Json<T>, JsonRejection>,
    instance: &ProblemInstance,
) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|e| AppError::BadRequest(e.body_text()).at(instance))
}

/// Parse a path id, answering 404 for malformed ids.
pub fn path_id<Id: std::str::FromStr>(
    raw: &str,
    what: &str,
    instance: &ProblemInstance,
) -> Result<Id, ApiError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("{what} not found")).at(instance))
}
