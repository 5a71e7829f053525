//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors and transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (record `x-request-id` on the span and response)
//! 4. Security headers (strict CSP, no caching)
//! 5. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Authentication is enforced per handler by the [`RequireAdminAuth`]
//! extractor.

pub mod auth;
pub mod headers;
pub mod session;

pub use auth::{
    AdminAuthRejection, OptionalAdminAuth, RequireAdminAuth, clear_current_admin, set_current_admin,
    set_flash, take_flash,
};
pub use headers::{request_id_middleware, security_headers_middleware};
pub use session::create_session_layer;
