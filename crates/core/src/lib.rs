//! Shop Core - Shared domain types and pure logic.
//!
//! This crate provides the types used across all shop components:
//! - `storefront` - Public catalog, blog and JSON API
//! - `admin` - Back-office for orders and users
//! - `cli` - Migrations, seeding and admin account management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. Optional `postgres` support adds sqlx
//! encoding for ids and status enums.
//!
//! # Modules
//!
//! - [`types`] - Ids, emails, money, languages and statuses
//! - [`pagination`] - Page requests, page metadata and list envelopes
//! - [`catalog`] - Product filters, sorting and listing cards
//! - [`blog`] - Blog post transfer record
//! - [`order`] - Order details, summary computation and display helpers
//! - [`bulk`] - Tally of best-effort bulk operations
//! - [`problem`] - RFC 7807 problem details
//! - [`search`] - Free-text search patterns

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod blog;
pub mod bulk;
pub mod catalog;
pub mod order;
pub mod pagination;
pub mod problem;
pub mod search;
pub mod types;

pub use bulk::BulkOutcome;
pub use pagination::{PageMeta, PageRequest, Paginated};
pub use problem::ProblemDetails;
pub use types::*;
