//! Status enums for orders, payments, fulfillment, shipping and users.
//!
//! All values are stored as lower-case text in the database and on the wire.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a status string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct InvalidStatus {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $text:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            /// Human-readable label for admin pages.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = InvalidStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(InvalidStatus { kind: $kind, value: s.to_owned() }),
                }
            }
        }
    };
}

text_enum! {
    /// Overall order lifecycle status.
    OrderStatus, "order status" {
        Pending => "pending", "Pending";
        Processing => "processing", "Processing";
        Completed => "completed", "Completed";
        Cancelled => "cancelled", "Cancelled";
    }
}

text_enum! {
    /// Payment state of an order.
    PaymentStatus, "payment status" {
        Pending => "pending", "Pending";
        Paid => "paid", "Paid";
        Failed => "failed", "Failed";
        Refunded => "refunded", "Refunded";
    }
}

text_enum! {
    /// Fulfillment state of an order.
    FulfillmentStatus, "fulfillment status" {
        Unfulfilled => "unfulfilled", "Unfulfilled";
        Fulfilled => "fulfilled", "Fulfilled";
        Shipped => "shipped", "Shipped";
        Delivered => "delivered", "Delivered";
    }
}

text_enum! {
    /// Role a user can hold. Users may hold several.
    UserRole, "user role" {
        Admin => "admin", "Admin";
        Customer => "customer", "Customer";
    }
}

/// Role filter on the admin users list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleFilter {
    #[default]
    All,
    Admin,
    Customer,
}

impl RoleFilter {
    /// Parse a query value. Empty or unknown values mean no filter.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("admin") => Self::Admin,
            Some("customer") => Self::Customer,
            _ => Self::All,
        }
    }

    /// Role to filter by, if any.
    #[must_use]
    pub const fn role(self) -> Option<UserRole> {
        match self {
            Self::All => None,
            Self::Admin => Some(UserRole::Admin),
            Self::Customer => Some(UserRole::Customer),
        }
    }

    /// Query-string value, empty for [`RoleFilter::All`].
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }
}

/// How an order reaches the customer.
///
/// Unknown methods are kept verbatim so they can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShippingMethod {
    Pickup,
    Delivery,
    Other(String),
}

impl ShippingMethod {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pickup => "pickup",
            Self::Delivery => "delivery",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub const fn is_pickup(&self) -> bool {
        matches!(self, Self::Pickup)
    }

    #[must_use]
    pub const fn is_delivery(&self) -> bool {
        matches!(self, Self::Delivery)
    }
}

impl From<String> for ShippingMethod {
    fn from(value: String) -> Self {
        match value.trim() {
            "pickup" => Self::Pickup,
            "delivery" => Self::Delivery,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ShippingMethod {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<ShippingMethod> for String {
    fn from(method: ShippingMethod) -> Self {
        method.as_str().to_owned()
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested delivery window within a day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeliveryTimeSlot {
    FirstHalf,
    SecondHalf,
    Other(String),
}

impl DeliveryTimeSlot {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::FirstHalf => "first_half",
            Self::SecondHalf => "second_half",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::FirstHalf => "First half of the day (09:00-14:00)",
            Self::SecondHalf => "Second half of the day (14:00-19:00)",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for DeliveryTimeSlot {
    fn from(value: String) -> Self {
        match value.trim() {
            "first_half" => Self::FirstHalf,
            "second_half" => Self::SecondHalf,
            _ => Self::Other(value),
        }
    }
}

impl From<DeliveryTimeSlot> for String {
    fn from(slot: DeliveryTimeSlot) -> Self {
        slot.as_str().to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_through_text() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), *status);
        }
        assert_eq!("PAID".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
    }

    #[test]
    fn test_invalid_status_message() {
        let err = "lost".parse::<FulfillmentStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid fulfillment status: lost");
    }

    #[test]
    fn test_role_filter_from_query() {
        assert_eq!(RoleFilter::from_query(None), RoleFilter::All);
        assert_eq!(RoleFilter::from_query(Some("")), RoleFilter::All);
        assert_eq!(RoleFilter::from_query(Some("admin")), RoleFilter::Admin);
        assert_eq!(
            RoleFilter::from_query(Some("customer")).role(),
            Some(UserRole::Customer)
        );
        assert_eq!(RoleFilter::from_query(Some("root")), RoleFilter::All);
    }

    #[test]
    fn test_shipping_method_keeps_unknown_values() {
        assert!(ShippingMethod::from("pickup").is_pickup());
        assert!(ShippingMethod::from("delivery").is_delivery());
        let other = ShippingMethod::from("courier");
        assert_eq!(other.as_str(), "courier");

        let json = serde_json::to_string(&ShippingMethod::Pickup).unwrap();
        assert_eq!(json, "\"pickup\"");
    }

    #[test]
    fn test_time_slot_labels() {
        let slot: DeliveryTimeSlot = serde_json::from_str("\"first_half\"").unwrap();
        assert_eq!(slot.label(), "First half of the day (09:00-14:00)");
        assert_eq!(
            DeliveryTimeSlot::from("evening".to_owned()).label(),
            "evening"
        );
    }
}
