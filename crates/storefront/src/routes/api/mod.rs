//! Public JSON API under `/api/v1`.
//!
//! Errors are RFC 7807 problem details. Every endpoint takes `?lang=` and
//! defaults to English.

pub mod blog;
pub mod delivery;
pub mod products;

use axum::{Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Single-record envelope: `{ "data": ... }`.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

/// Create the `/api/v1` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/products/filters", get(products::filters))
        .route("/products/{slug}", get(products::show))
        .route("/blog", get(blog::list))
        .route("/blog/{slug}", get(blog::show))
        .route("/delivery/price", get(delivery::price))
}
