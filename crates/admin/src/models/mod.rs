//! Domain models for the admin panel.

pub mod order;
pub mod session;
pub mod user;

pub use order::{OrderRow, OrderUpdate};
pub use session::{CurrentAdmin, Flash, FlashKind, keys as session_keys};
pub use user::{AdminUserRow, UserUpdate};
