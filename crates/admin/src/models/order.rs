//! Order list rows and updates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shop_core::{Currency, FulfillmentStatus, OrderId, OrderStatus, PaymentStatus};

/// One row of the admin orders list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRow {
    pub id: OrderId,
    pub number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub fulfillment_status: FulfillmentStatus,
    pub total: Decimal,
    pub currency: Currency,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub items_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Status and notes changes from the order page or API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub fulfillment_status: Option<FulfillmentStatus>,
    /// `Some("")` clears the notes.
    pub admin_notes: Option<String>,
}

impl OrderUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.payment_status.is_none()
            && self.fulfillment_status.is_none()
            && self.admin_notes.is_none()
    }
}
