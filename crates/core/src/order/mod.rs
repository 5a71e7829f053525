//! Order transfer records and the display rules of the admin order page.
//!
//! Older orders carry flat amount fields (`subtotal`, `shippingAmount`, ...)
//! while newer ones also carry a `totals` object. Display code always
//! prefers `totals` and falls back to the flat fields.

mod summary;
mod variant;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    Currency, DeliveryTimeSlot, FulfillmentStatus, OrderId, OrderItemId, OrderStatus,
    PaymentStatus, ShippingMethod, UserId,
};

pub use summary::{OrderSummary, ShippingDisplay, needs_delivery_price};
pub use variant::{OptionDisplay, color_hex, parse_color_list};

/// Optional totals object attached to newer orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub shipping: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub total: Option<Decimal>,
    pub currency: Option<Currency>,
}

/// Customer attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub id: Option<UserId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Billing or shipping address.
///
/// `address`/`addressLine1` and `phone`/`shippingPhone` are aliases written
/// by different checkout versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub shipping_phone: Option<String>,
    /// Requested delivery date as `YYYY-MM-DD`.
    pub delivery_day: Option<String>,
    pub delivery_time_slot: Option<DeliveryTimeSlot>,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl Address {
    /// Street line: `address` or `addressLine1`, then `, addressLine2`.
    #[must_use]
    pub fn street_line(&self) -> Option<String> {
        let first = present(self.address.as_ref()).or_else(|| present(self.address_line1.as_ref()))?;
        Some(match present(self.address_line2.as_ref()) {
            Some(second) => format!("{first}, {second}"),
            None => first.to_owned(),
        })
    }

    /// Trimmed city, if any.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        present(self.city.as_ref())
    }

    #[must_use]
    pub fn postal_code(&self) -> Option<&str> {
        present(self.postal_code.as_ref())
    }

    /// `phone`, falling back to `shippingPhone`.
    #[must_use]
    pub fn contact_phone(&self) -> Option<&str> {
        present(self.phone.as_ref()).or_else(|| present(self.shipping_phone.as_ref()))
    }

    /// Delivery day as `Wednesday, Jan 15, 2025`, or the raw value when it
    /// is not a valid `YYYY-MM-DD` date.
    #[must_use]
    pub fn delivery_day_display(&self) -> Option<String> {
        let raw = present(self.delivery_day.as_ref())?;
        Some(format_delivery_day(raw))
    }

    #[must_use]
    pub fn delivery_slot_display(&self) -> Option<String> {
        self.delivery_time_slot
            .as_ref()
            .map(|slot| slot.label().to_owned())
            .filter(|label| !label.trim().is_empty())
    }
}

/// Parse `YYYY-MM-DD` as a calendar date (no timezone involved).
fn format_delivery_day(raw: &str) -> String {
    let mut parts = raw.split('-').map(|p| p.trim().parse::<u32>().ok());
    let date = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(Some(year)), Some(Some(month)), Some(Some(day)), None) => i32::try_from(year)
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, month, day)),
        _ => None,
    };
    date.map_or_else(
        || raw.to_owned(),
        |d| d.format("%A, %b %-d, %Y").to_string(),
    )
}

/// Payment attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayment {
    pub provider: Option<String>,
    pub method: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<Currency>,
    pub status: Option<PaymentStatus>,
    pub card_last4: Option<String>,
    pub card_brand: Option<String>,
}

impl OrderPayment {
    /// `Visa ••••4242` when both brand and last four digits are known.
    #[must_use]
    pub fn card_display(&self) -> Option<String> {
        let brand = present(self.card_brand.as_ref())?;
        let last4 = present(self.card_last4.as_ref())?;
        Some(format!("{brand} ••••{last4}"))
    }

    /// Method, falling back to provider.
    #[must_use]
    pub fn method_display(&self) -> Option<&str> {
        present(self.method.as_ref()).or_else(|| present(self.provider.as_ref()))
    }
}

/// Variant option recorded on an order line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOption {
    pub attribute_key: Option<String>,
    pub value: Option<String>,
    pub label: Option<String>,
    pub image_url: Option<String>,
    /// Swatch colours; older rows store this as a JSON-encoded string.
    #[serde(default, deserialize_with = "variant::deserialize_colors")]
    pub colors: Vec<String>,
}

/// A single order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_title: String,
    pub sku: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
    #[serde(default)]
    pub variant_options: Vec<VariantOption>,
}

/// Everything the admin order page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub id: OrderId,
    pub number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub fulfillment_status: FulfillmentStatus,
    pub total: Decimal,
    pub currency: Currency,
    pub subtotal: Option<Decimal>,
    pub shipping_amount: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub totals: Option<OrderTotals>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub customer: Option<OrderCustomer>,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
    pub shipping_method: ShippingMethod,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
    pub payment: Option<OrderPayment>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrderDetails {
    /// Customer name: first name plus last name, or `Unknown customer`.
    #[must_use]
    pub fn customer_name(&self) -> String {
        let Some(customer) = &self.customer else {
            return "Unknown customer".to_owned();
        };
        let first = present(customer.first_name.as_ref());
        let last = present(customer.last_name.as_ref());
        match (first, last) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.to_owned(),
            (None, None) => "Unknown customer".to_owned(),
        }
    }

    /// Order email, falling back to the customer record.
    #[must_use]
    pub fn contact_email(&self) -> Option<&str> {
        present(self.customer_email.as_ref()).or_else(|| {
            self.customer
                .as_ref()
                .and_then(|c| present(c.email.as_ref()))
        })
    }

    /// Order phone, falling back to the customer record.
    #[must_use]
    pub fn contact_phone(&self) -> Option<&str> {
        present(self.customer_phone.as_ref()).or_else(|| {
            self.customer
                .as_ref()
                .and_then(|c| present(c.phone.as_ref()))
        })
    }

    /// Total shown in the header card: `totals.total`, else `total`.
    #[must_use]
    pub fn headline_total(&self) -> Decimal {
        self.totals
            .as_ref()
            .and_then(|t| t.total)
            .unwrap_or(self.total)
    }

    /// Shipping amount currently recorded on the order (before lookups).
    #[must_use]
    pub fn recorded_shipping(&self) -> Decimal {
        self.totals
            .as_ref()
            .and_then(|t| t.shipping)
            .or(self.shipping_amount)
            .unwrap_or_default()
    }

    /// Trimmed shipping city, if any.
    #[must_use]
    pub fn shipping_city(&self) -> Option<&str> {
        self.shipping_address.as_ref().and_then(Address::city)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn order() -> OrderDetails {
        OrderDetails {
            id: OrderId::generate(),
            number: "260115-00042".to_owned(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            fulfillment_status: FulfillmentStatus::Unfulfilled,
            total: Decimal::ZERO,
            currency: Currency::USD,
            subtotal: None,
            shipping_amount: None,
            discount_amount: None,
            tax_amount: None,
            totals: None,
            customer_email: None,
            customer_phone: None,
            customer: None,
            billing_address: None,
            shipping_address: None,
            shipping_method: ShippingMethod::Delivery,
            notes: None,
            admin_notes: None,
            payment: None,
            items: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn item(total: i64) -> OrderItem {
        OrderItem {
            id: OrderItemId::generate(),
            product_title: "Linen shirt".to_owned(),
            sku: Some("LS-01".to_owned()),
            quantity: 1,
            unit_price: Decimal::from(total),
            total: Decimal::from(total),
            variant_options: Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_name_fallbacks() {
        let mut order = fixtures::order();
        assert_eq!(order.customer_name(), "Unknown customer");

        order.customer = Some(OrderCustomer {
            first_name: Some("Ani".to_owned()),
            last_name: Some("  ".to_owned()),
            ..OrderCustomer::default()
        });
        assert_eq!(order.customer_name(), "Ani");

        order.customer = Some(OrderCustomer {
            first_name: Some("Ani".to_owned()),
            last_name: Some("Petrosyan".to_owned()),
            ..OrderCustomer::default()
        });
        assert_eq!(order.customer_name(), "Ani Petrosyan");
    }

    #[test]
    fn test_street_line_prefers_address_then_line1() {
        let address = Address {
            address_line1: Some("12 Abovyan St".to_owned()),
            address_line2: Some("apt 4".to_owned()),
            ..Address::default()
        };
        assert_eq!(address.street_line().unwrap(), "12 Abovyan St, apt 4");

        let address = Address {
            address: Some("1 Main".to_owned()),
            address_line1: Some("ignored".to_owned()),
            ..Address::default()
        };
        assert_eq!(address.street_line().unwrap(), "1 Main");
        assert_eq!(Address::default().street_line(), None);
    }

    #[test]
    fn test_contact_phone_alias() {
        let address = Address {
            shipping_phone: Some("+37499000000".to_owned()),
            ..Address::default()
        };
        assert_eq!(address.contact_phone(), Some("+37499000000"));
    }

    #[test]
    fn test_delivery_day_display() {
        let address = Address {
            delivery_day: Some("2025-01-15".to_owned()),
            ..Address::default()
        };
        assert_eq!(
            address.delivery_day_display().unwrap(),
            "Wednesday, Jan 15, 2025"
        );

        let address = Address {
            delivery_day: Some("tomorrow".to_owned()),
            ..Address::default()
        };
        assert_eq!(address.delivery_day_display().unwrap(), "tomorrow");

        let address = Address {
            delivery_day: Some("2025-02-30".to_owned()),
            ..Address::default()
        };
        assert_eq!(address.delivery_day_display().unwrap(), "2025-02-30");
    }

    #[test]
    fn test_card_display() {
        let payment = OrderPayment {
            card_brand: Some("Visa".to_owned()),
            card_last4: Some("4242".to_owned()),
            ..OrderPayment::default()
        };
        assert_eq!(payment.card_display().unwrap(), "Visa ••••4242");
        assert_eq!(OrderPayment::default().card_display(), None);
    }

    #[test]
    fn test_headline_total_prefers_totals() {
        let mut order = fixtures::order();
        order.total = Decimal::from(10);
        assert_eq!(order.headline_total(), Decimal::from(10));
        order.totals = Some(OrderTotals {
            total: Some(Decimal::from(12)),
            ..OrderTotals::default()
        });
        assert_eq!(order.headline_total(), Decimal::from(12));
    }

    #[test]
    fn test_deserializes_camel_case_payload() {
        let json = serde_json::json!({
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "number": "A-1",
            "status": "pending",
            "paymentStatus": "paid",
            "fulfillmentStatus": "unfulfilled",
            "total": "20.00",
            "currency": "USD",
            "subtotal": null,
            "shippingAmount": "0",
            "discountAmount": null,
            "taxAmount": null,
            "totals": null,
            "customerEmail": "ani@shop.am",
            "customerPhone": null,
            "customer": null,
            "billingAddress": null,
            "shippingAddress": {"addressLine1": "1 Main", "city": "Yerevan", "deliveryTimeSlot": "second_half"},
            "shippingMethod": "delivery",
            "notes": null,
            "adminNotes": null,
            "payment": null,
            "items": [],
            "createdAt": "2025-01-15T10:00:00Z",
            "updatedAt": null
        });
        let order: OrderDetails = serde_json::from_value(json).unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.shipping_city(), Some("Yerevan"));
        assert_eq!(
            order
                .shipping_address
                .as_ref()
                .and_then(Address::delivery_slot_display)
                .unwrap(),
            "Second half of the day (14:00-19:00)"
        );
    }
}
