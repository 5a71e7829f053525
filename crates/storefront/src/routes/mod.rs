//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Home page
//! GET  /health                   - Health check
//! GET  /health/ready             - Readiness check (database ping)
//!
//! # Catalog
//! GET  /products                 - Product listing with filters
//! GET  /products/{slug}          - Product detail
//!
//! # Blog
//! GET  /blog                     - Published posts
//! GET  /blog/{slug}              - Article
//!
//! # Preferences
//! POST /preferences/language     - Store language, redirect back
//! POST /preferences/currency     - Store currency, redirect back
//!
//! # JSON API (rate limited)
//! GET  /api/v1/products          - Paginated product cards
//! GET  /api/v1/products/filters  - Sidebar facets
//! GET  /api/v1/products/{slug}   - Product detail
//! GET  /api/v1/blog              - Paginated posts
//! GET  /api/v1/blog/{slug}       - Single post
//! GET  /api/v1/delivery/price    - Delivery price for a city
//! ```

pub mod api;
pub mod blog;
pub mod home;
pub mod preferences;
pub mod products;
pub mod views;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::api_rate_limiter;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the blog routes router.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::index))
        .route("/{slug}", get(blog::show))
}

/// Create the preference routes router.
pub fn preference_routes() -> Router<AppState> {
    Router::new()
        .route("/language", post(preferences::update_language))
        .route("/currency", post(preferences::update_currency))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/blog", blog_routes())
        .nest("/preferences", preference_routes())
        .nest("/api/v1", api::router().layer(api_rate_limiter()))
}
