//! Order pages: list, detail, status updates and bulk delete.

mod detail;
mod list;
pub mod types;

pub use detail::{OrderShowTemplate, delivery_price_for, show, update};
pub use list::{ORDERS_PAGE_SIZE, OrdersIndexTemplate, bulk_delete, index};
pub use types::{OrderDetailView, OrderListView, OrdersQuery};
