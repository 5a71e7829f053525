//! Query parameters and view models for the order pages.

use serde::Deserialize;

use shop_core::order::{Address, OrderDetails, OrderItem, OrderPayment, OrderSummary, ShippingDisplay};
use shop_core::types::money::format_amount;
use shop_core::{Currency, FulfillmentStatus, OrderStatus, PaymentStatus};

use crate::models::OrderRow;
use crate::routes::format_timestamp;

// =============================================================================
// Query Parameters
// =============================================================================

/// Query parameters for the orders list.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub page: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

/// Order update form. Blank selects leave the field unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct OrderUpdateForm {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub fulfillment_status: Option<String>,
    pub admin_notes: Option<String>,
}

// =============================================================================
// List Views
// =============================================================================

/// `<option>` of a select.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Options for every variant of a status enum.
pub fn select_options<T: Copy + PartialEq>(
    all: &[T],
    current: Option<T>,
    value: fn(T) -> &'static str,
    label: fn(T) -> &'static str,
) -> Vec<SelectOption> {
    all.iter()
        .map(|&item| SelectOption {
            value: value(item),
            label: label(item),
            selected: current == Some(item),
        })
        .collect()
}

/// Order row in the list table.
#[derive(Debug, Clone)]
pub struct OrderListView {
    pub id: String,
    pub number: String,
    pub customer: String,
    pub status: &'static str,
    pub status_class: &'static str,
    pub payment_status: &'static str,
    pub fulfillment_status: &'static str,
    pub items_count: i64,
    pub total: String,
    pub created_at: String,
}

/// Badge modifier for an order status.
#[must_use]
pub const fn status_class(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "badge-warning",
        OrderStatus::Processing => "badge-info",
        OrderStatus::Completed => "badge-success",
        OrderStatus::Cancelled => "badge-muted",
    }
}

impl From<&OrderRow> for OrderListView {
    fn from(row: &OrderRow) -> Self {
        let customer = row
            .customer_email
            .as_deref()
            .or(row.customer_phone.as_deref())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or("—")
            .to_string();

        Self {
            id: row.id.to_string(),
            number: row.number.clone(),
            customer,
            status: row.status.label(),
            status_class: status_class(row.status),
            payment_status: row.payment_status.label(),
            fulfillment_status: row.fulfillment_status.label(),
            items_count: row.items_count,
            total: format_amount(row.total, row.currency),
            created_at: format_timestamp(&row.created_at),
        }
    }
}

// =============================================================================
// Detail Views
// =============================================================================

/// Delivery address block.
#[derive(Debug, Clone, Default)]
pub struct AddressView {
    pub name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub delivery_day: Option<String>,
    pub delivery_slot: Option<String>,
}

impl From<&Address> for AddressView {
    fn from(address: &Address) -> Self {
        let name = [address.first_name.as_deref(), address.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            name: (!name.is_empty()).then_some(name),
            street: address.street_line(),
            city: address.city().map(str::to_owned),
            postal_code: address.postal_code().map(str::to_owned),
            phone: address.contact_phone().map(str::to_owned),
            delivery_day: address.delivery_day_display(),
            delivery_slot: address.delivery_slot_display(),
        }
    }
}

/// Shipping block of the order page.
#[derive(Debug, Clone)]
pub enum ShippingView {
    Pickup,
    Delivery(AddressView),
    /// Delivery without an address; carries the method label.
    NoAddress(String),
}

impl ShippingView {
    fn new(order: &OrderDetails) -> Self {
        if order.shipping_method.is_pickup() {
            return Self::Pickup;
        }
        match &order.shipping_address {
            Some(address) => Self::Delivery(AddressView::from(address)),
            None => Self::NoAddress(order.shipping_method.to_string()),
        }
    }
}

/// Payment block of the order page.
#[derive(Debug, Clone)]
pub struct PaymentView {
    pub method: Option<String>,
    pub amount: Option<String>,
    pub status: Option<&'static str>,
    pub card: Option<String>,
}

impl PaymentView {
    fn new(payment: &OrderPayment, order_currency: Currency) -> Self {
        Self {
            method: payment.method_display().map(str::to_owned),
            amount: payment
                .amount
                .map(|a| format_amount(a, payment.currency.unwrap_or(order_currency))),
            status: payment.status.map(PaymentStatus::label),
            card: payment.card_display(),
        }
    }
}

/// Variant option chip on an order line.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub label: String,
    pub image_url: Option<String>,
    pub swatch: Option<String>,
}

/// Order line.
#[derive(Debug, Clone)]
pub struct ItemView {
    pub title: String,
    pub sku: Option<String>,
    pub quantity: i32,
    pub unit_price: String,
    pub total: String,
    pub options: Vec<OptionView>,
}

impl ItemView {
    fn new(item: &OrderItem, currency: Currency) -> Self {
        Self {
            title: item.product_title.clone(),
            sku: item.sku.clone().filter(|s| !s.trim().is_empty()),
            quantity: item.quantity,
            unit_price: format_amount(item.unit_price, currency),
            total: format_amount(item.total, currency),
            options: item
                .variant_options
                .iter()
                .filter_map(|option| option.display())
                .map(|d| OptionView {
                    label: d.label,
                    image_url: d.image_url,
                    swatch: d.swatch,
                })
                .collect(),
        }
    }
}

/// Order summary lines.
#[derive(Debug, Clone)]
pub struct SummaryView {
    pub subtotal: String,
    pub discount: Option<String>,
    pub shipping: String,
    pub tax: Option<String>,
    pub total: String,
}

impl SummaryView {
    #[must_use]
    pub fn new(summary: &OrderSummary, currency: Currency) -> Self {
        let shipping = match &summary.shipping_display {
            ShippingDisplay::Free => "Free".to_string(),
            ShippingDisplay::Priced { amount, city } => {
                format!("{} ({city})", format_amount(*amount, currency))
            }
            ShippingDisplay::EnterCity => "Enter city to calculate".to_string(),
        };

        Self {
            subtotal: format_amount(summary.subtotal, currency),
            discount: summary
                .has_discount()
                .then(|| format!("-{}", format_amount(summary.discount, currency))),
            shipping,
            tax: summary.has_tax().then(|| format_amount(summary.tax, currency)),
            total: format_amount(summary.total, currency),
        }
    }
}

/// Everything the order page shows.
#[derive(Debug, Clone)]
pub struct OrderDetailView {
    pub id: String,
    pub number: String,
    pub total: String,
    pub status: &'static str,
    pub status_class: &'static str,
    pub payment_status: &'static str,
    pub fulfillment_status: &'static str,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub shipping: ShippingView,
    pub payment: Option<PaymentView>,
    pub items: Vec<ItemView>,
    pub summary: SummaryView,
    pub notes: Option<String>,
    pub admin_notes: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub status_options: Vec<SelectOption>,
    pub payment_status_options: Vec<SelectOption>,
    pub fulfillment_status_options: Vec<SelectOption>,
}

impl OrderDetailView {
    #[must_use]
    pub fn new(order: &OrderDetails, summary: &OrderSummary) -> Self {
        let currency = order.currency;

        Self {
            id: order.id.to_string(),
            number: order.number.clone(),
            total: format_amount(order.headline_total(), currency),
            status: order.status.label(),
            status_class: status_class(order.status),
            payment_status: order.payment_status.label(),
            fulfillment_status: order.fulfillment_status.label(),
            customer_name: order.customer_name(),
            customer_email: order.contact_email().map(str::to_owned),
            customer_phone: order.contact_phone().map(str::to_owned),
            shipping: ShippingView::new(order),
            payment: order
                .payment
                .as_ref()
                .map(|payment| PaymentView::new(payment, currency)),
            items: order
                .items
                .iter()
                .map(|item| ItemView::new(item, currency))
                .collect(),
            summary: SummaryView::new(summary, currency),
            notes: order.notes.clone().filter(|n| !n.trim().is_empty()),
            admin_notes: order.admin_notes.clone().unwrap_or_default(),
            created_at: format_timestamp(&order.created_at),
            updated_at: order.updated_at.as_ref().map(format_timestamp),
            status_options: select_options(
                OrderStatus::ALL,
                Some(order.status),
                OrderStatus::as_str,
                OrderStatus::label,
            ),
            payment_status_options: select_options(
                PaymentStatus::ALL,
                Some(order.payment_status),
                PaymentStatus::as_str,
                PaymentStatus::label,
            ),
            fulfillment_status_options: select_options(
                FulfillmentStatus::ALL,
                Some(order.fulfillment_status),
                FulfillmentStatus::as_str,
                FulfillmentStatus::label,
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn summary(display: ShippingDisplay) -> OrderSummary {
        OrderSummary {
            subtotal: Decimal::new(5000, 2),
            discount: Decimal::ZERO,
            shipping: Decimal::new(250, 2),
            tax: Decimal::ZERO,
            total: Decimal::new(5250, 2),
            shipping_display: display,
        }
    }

    #[test]
    fn test_shipping_line_variants() {
        let free = SummaryView::new(&summary(ShippingDisplay::Free), Currency::USD);
        assert_eq!(free.shipping, "Free");

        let priced = SummaryView::new(
            &summary(ShippingDisplay::Priced {
                amount: Decimal::new(250, 2),
                city: "Yerevan".to_string(),
            }),
            Currency::USD,
        );
        assert!(priced.shipping.ends_with(" (Yerevan)"));

        let unknown = SummaryView::new(&summary(ShippingDisplay::EnterCity), Currency::USD);
        assert_eq!(unknown.shipping, "Enter city to calculate");
    }

    #[test]
    fn test_amd_summary_formatted_without_conversion() {
        let amd = OrderSummary {
            subtotal: Decimal::from(20_000),
            discount: Decimal::ZERO,
            shipping: Decimal::from(1000),
            tax: Decimal::ZERO,
            total: Decimal::from(21_000),
            shipping_display: ShippingDisplay::Priced {
                amount: Decimal::from(1000),
                city: "Yerevan".to_string(),
            },
        };
        let view = SummaryView::new(&amd, Currency::AMD);
        assert_eq!(view.shipping, "1,000 ֏ (Yerevan)");
        assert_eq!(view.total, "21,000 ֏");
    }

    #[test]
    fn test_zero_discount_and_tax_hidden() {
        let view = SummaryView::new(&summary(ShippingDisplay::Free), Currency::USD);
        assert!(view.discount.is_none());
        assert!(view.tax.is_none());
    }

    #[test]
    fn test_select_options_mark_current() {
        let options = select_options(
            OrderStatus::ALL,
            Some(OrderStatus::Completed),
            OrderStatus::as_str,
            OrderStatus::label,
        );
        let selected: Vec<_> = options.iter().filter(|o| o.selected).map(|o| o.value).collect();
        assert_eq!(selected, vec!["completed"]);
    }

    #[test]
    fn test_address_view_skips_missing_parts() {
        let address = Address {
            city: Some("Yerevan".to_string()),
            ..Address::default()
        };
        let view = AddressView::from(&address);
        assert_eq!(view.city.as_deref(), Some("Yerevan"));
        assert!(view.street.is_none());
    }
}
