//! Core types for the shop.
//!
//! Type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod language;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use language::Language;
pub use money::{Currency, format_price};
pub use status::*;
