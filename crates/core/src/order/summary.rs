//! Order summary recomputation.

use rust_decimal::Decimal;
use serde::Serialize;

use super::OrderDetails;
use crate::types::money::{Currency, convert};

/// How the shipping line of the summary is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ShippingDisplay {
    /// Store pickup, always free.
    Free,
    /// A priced delivery to `city`.
    Priced { amount: Decimal, city: String },
    /// Delivery without a city, so no price can be shown.
    EnterCity,
}

/// Derived order totals, recomputed from the stored fields.
///
/// `total` is `subtotal + shipping`; tax is reported separately and not
/// added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub shipping_display: ShippingDisplay,
}

/// Whether a delivery price lookup is needed to show shipping.
///
/// True for delivery orders with a shipping city whose recorded shipping
/// amount is zero.
#[must_use]
pub fn needs_delivery_price(order: &OrderDetails) -> bool {
    order.shipping_method.is_delivery()
        && order.shipping_city().is_some()
        && order.recorded_shipping().is_zero()
}

impl OrderSummary {
    /// Compute the summary in the order's currency. `delivery_price_amd` is
    /// the looked-up delivery price for the shipping city, in AMD, if a lookup
    /// was made and found one.
    #[must_use]
    pub fn compute(order: &OrderDetails, delivery_price_amd: Option<Decimal>) -> Self {
        let totals = order.totals.as_ref();

        let original_subtotal = totals
            .and_then(|t| t.subtotal)
            .or(order.subtotal)
            .unwrap_or_default();
        let discount = totals
            .and_then(|t| t.discount)
            .or(order.discount_amount)
            .unwrap_or_default();

        // Without a discount, line totals may already be discounted.
        let subtotal = if discount > Decimal::ZERO {
            original_subtotal - discount
        } else {
            order.items.iter().map(|item| item.total).sum()
        };

        let is_pickup = order.shipping_method.is_pickup();
        let base_shipping = if is_pickup {
            Decimal::ZERO
        } else {
            order.recorded_shipping()
        };
        let shipping = match delivery_price_amd {
            Some(price) if !is_pickup && base_shipping.is_zero() => {
                convert(price, Currency::AMD, order.currency)
            }
            _ => base_shipping,
        };

        let tax = totals
            .and_then(|t| t.tax)
            .or(order.tax_amount)
            .unwrap_or_default();

        let shipping_display = if is_pickup {
            ShippingDisplay::Free
        } else if let Some(city) = order.shipping_city() {
            ShippingDisplay::Priced {
                amount: shipping,
                city: city.to_owned(),
            }
        } else {
            ShippingDisplay::EnterCity
        };

        Self {
            subtotal,
            discount,
            shipping,
            tax,
            total: subtotal + shipping,
            shipping_display,
        }
    }

    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount > Decimal::ZERO
    }

    #[must_use]
    pub fn has_tax(&self) -> bool {
        self.tax > Decimal::ZERO
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::order::fixtures::{item, order};
    use crate::order::{Address, OrderTotals};
    use crate::types::ShippingMethod;

    fn with_city(city: &str) -> Option<Address> {
        Some(Address {
            city: Some(city.to_owned()),
            ..Address::default()
        })
    }

    #[test]
    fn test_pickup_shipping_is_always_zero() {
        let mut o = order();
        o.shipping_method = ShippingMethod::Pickup;
        o.shipping_amount = Some(Decimal::from(15));
        o.shipping_address = with_city("Yerevan");
        o.totals = Some(OrderTotals {
            shipping: Some(Decimal::from(7)),
            ..OrderTotals::default()
        });

        let summary = OrderSummary::compute(&o, Some(Decimal::from(2000)));
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.shipping_display, ShippingDisplay::Free);
        assert!(!needs_delivery_price(&o));
    }

    #[test]
    fn test_subtotal_uses_items_without_discount() {
        let mut o = order();
        o.subtotal = Some(Decimal::from(999));
        o.items = vec![item(10), item(15)];

        let summary = OrderSummary::compute(&o, None);
        assert_eq!(summary.subtotal, Decimal::from(25));
        assert!(!summary.has_discount());
    }

    #[test]
    fn test_subtotal_subtracts_discount_from_original() {
        let mut o = order();
        o.items = vec![item(10)];
        o.totals = Some(OrderTotals {
            subtotal: Some(Decimal::from(100)),
            discount: Some(Decimal::from(20)),
            ..OrderTotals::default()
        });
        o.discount_amount = Some(Decimal::from(5));

        let summary = OrderSummary::compute(&o, None);
        assert_eq!(summary.discount, Decimal::from(20));
        assert_eq!(summary.subtotal, Decimal::from(80));
    }

    #[test]
    fn test_totals_take_precedence_over_flat_fields() {
        let mut o = order();
        o.shipping_address = with_city("Gyumri");
        o.shipping_amount = Some(Decimal::from(3));
        o.tax_amount = Some(Decimal::from(1));
        o.totals = Some(OrderTotals {
            shipping: Some(Decimal::from(6)),
            tax: Some(Decimal::from(2)),
            ..OrderTotals::default()
        });

        let summary = OrderSummary::compute(&o, None);
        assert_eq!(summary.shipping, Decimal::from(6));
        assert_eq!(summary.tax, Decimal::from(2));
    }

    #[test]
    fn test_delivery_price_used_when_shipping_is_zero() {
        let mut o = order();
        o.items = vec![item(20)];
        o.shipping_address = with_city(" Yerevan ");
        assert!(needs_delivery_price(&o));

        let summary = OrderSummary::compute(&o, Some(Decimal::from(1000)));
        assert_eq!(summary.shipping, Decimal::new(250, 2));
        assert_eq!(summary.total, Decimal::new(2250, 2));
        assert_eq!(
            summary.shipping_display,
            ShippingDisplay::Priced {
                amount: Decimal::new(250, 2),
                city: "Yerevan".to_owned()
            }
        );
    }

    #[test]
    fn test_delivery_price_kept_in_amd_for_amd_orders() {
        let mut o = order();
        o.currency = Currency::AMD;
        o.items = vec![item(20_000)];
        o.shipping_address = with_city("Yerevan");

        let summary = OrderSummary::compute(&o, Some(Decimal::from(1000)));
        assert_eq!(summary.shipping, Decimal::from(1000));
        assert_eq!(summary.total, Decimal::from(21_000));
    }

    #[test]
    fn test_recorded_shipping_wins_over_lookup() {
        let mut o = order();
        o.shipping_address = with_city("Yerevan");
        o.shipping_amount = Some(Decimal::from(4));
        assert!(!needs_delivery_price(&o));

        let summary = OrderSummary::compute(&o, Some(Decimal::from(1000)));
        assert_eq!(summary.shipping, Decimal::from(4));
    }

    #[test]
    fn test_no_city_asks_for_city() {
        let o = order();
        assert!(!needs_delivery_price(&o));
        let summary = OrderSummary::compute(&o, None);
        assert_eq!(summary.shipping_display, ShippingDisplay::EnterCity);
    }

    #[test]
    fn test_tax_is_not_added_to_total() {
        let mut o = order();
        o.items = vec![item(50)];
        o.tax_amount = Some(Decimal::from(9));

        let summary = OrderSummary::compute(&o, None);
        assert!(summary.has_tax());
        assert_eq!(summary.total, Decimal::from(50));
    }
}
