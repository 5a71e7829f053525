//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors and transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (record `x-request-id` on the span and response)
//! 4. Security headers (CSP, frame and referrer policies)
//! 5. Session layer (tower-sessions with `PostgreSQL` store)
//! 6. Rate limiting on `/api/v1` (governor)

pub mod preferences;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use preferences::{Preferences, set_currency, set_language};
pub use rate_limit::api_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
