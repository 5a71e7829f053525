//! Currencies, fixed-rate conversion and price formatting.
//!
//! Catalog and order amounts are stored in [`Currency::BASE`] (USD).
//! Delivery prices are stored in AMD and converted on display.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Display currency supported by the shop.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    AMD,
    USD,
    EUR,
    RUB,
}

/// Error returned when a currency code is not supported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency: {0}")]
pub struct UnknownCurrency(pub String);

impl Currency {
    /// Currency that stored catalog and order amounts are expressed in.
    pub const BASE: Self = Self::USD;

    /// Session key for the visitor's preferred display currency.
    pub const STORAGE_KEY: &'static str = "shop_currency";

    pub const ALL: [Self; 4] = [Self::AMD, Self::USD, Self::EUR, Self::RUB];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::AMD => "AMD",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::RUB => "RUB",
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::AMD => "֏",
            Self::USD => "$",
            Self::EUR => "€",
            Self::RUB => "₽",
        }
    }

    /// Units of this currency per one USD.
    #[must_use]
    pub fn rate(self) -> Decimal {
        match self {
            Self::USD => Decimal::ONE,
            Self::AMD => Decimal::from(400),
            Self::EUR => Decimal::new(92, 2),
            Self::RUB => Decimal::from(90),
        }
    }

    /// Decimal places shown when formatting.
    #[must_use]
    pub const fn display_scale(self) -> u32 {
        match self {
            Self::USD | Self::EUR => 2,
            Self::AMD | Self::RUB => 0,
        }
    }

    /// Resolve a stored preference, falling back to the default currency.
    #[must_use]
    pub fn resolve_stored(stored: Option<&str>) -> Self {
        stored.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AMD" => Ok(Self::AMD),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "RUB" => Ok(Self::RUB),
            _ => Err(UnknownCurrency(s.to_owned())),
        }
    }
}

/// Convert an amount between currencies through USD, rounded to 2 places.
#[must_use]
pub fn convert(amount: Decimal, from: Currency, to: Currency) -> Decimal {
    if from == to {
        return amount;
    }
    let usd = amount / from.rate();
    (usd * to.rate()).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount stored in the base currency for display in `currency`.
///
/// ```
/// use rust_decimal::Decimal;
/// use shop_core::{Currency, format_price};
///
/// let price = Decimal::new(123_450, 2);
/// assert_eq!(format_price(price, Currency::USD), "$1,234.50");
/// assert_eq!(format_price(price, Currency::AMD), "493,800 ֏");
/// ```
#[must_use]
pub fn format_price(amount: Decimal, currency: Currency) -> String {
    format_amount(convert(amount, Currency::BASE, currency), currency)
}

/// Format an amount that is already expressed in `currency`.
#[must_use]
pub fn format_amount(amount: Decimal, currency: Currency) -> String {
    let scale = currency.display_scale();
    let rounded = amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.*}", scale as usize, rounded.abs());
    let (int_part, frac_part) = digits
        .split_once('.')
        .map_or((digits.as_str(), None), |(i, f)| (i, Some(f)));

    let mut number = group_thousands(int_part);
    if let Some(frac) = frac_part {
        number.push('.');
        number.push_str(frac);
    }

    match currency {
        Currency::USD | Currency::EUR => format!("{sign}{}{number}", currency.symbol()),
        Currency::AMD | Currency::RUB => format!("{sign}{number} {}", currency.symbol()),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("amd".parse::<Currency>().unwrap(), Currency::AMD);
        assert_eq!(" Eur ".parse::<Currency>().unwrap(), Currency::EUR);
        assert!("GBP".parse::<Currency>().is_err());
    }

    #[test]
    fn test_resolve_stored_falls_back_to_amd() {
        assert_eq!(Currency::resolve_stored(Some("RUB")), Currency::RUB);
        assert_eq!(Currency::resolve_stored(Some("xyz")), Currency::AMD);
        assert_eq!(Currency::resolve_stored(None), Currency::AMD);
    }

    #[test]
    fn test_convert_amd_to_usd() {
        let usd = convert(Decimal::from(1000), Currency::AMD, Currency::USD);
        assert_eq!(usd, Decimal::new(250, 2));
    }

    #[test]
    fn test_convert_same_currency_is_identity() {
        let amount = Decimal::new(12_345, 3);
        assert_eq!(convert(amount, Currency::EUR, Currency::EUR), amount);
    }

    #[test]
    fn test_format_price_per_currency() {
        let price = Decimal::new(123_450, 2);
        assert_eq!(format_price(price, Currency::USD), "$1,234.50");
        assert_eq!(format_price(price, Currency::EUR), "€1,135.74");
        assert_eq!(format_price(price, Currency::AMD), "493,800 ֏");
        assert_eq!(format_price(price, Currency::RUB), "111,105 ₽");
    }

    #[test]
    fn test_format_small_and_negative_amounts() {
        assert_eq!(format_amount(Decimal::ZERO, Currency::USD), "$0.00");
        assert_eq!(format_amount(Decimal::new(-5, 0), Currency::USD), "-$5.00");
        assert_eq!(format_amount(Decimal::new(999, 0), Currency::AMD), "999 ֏");
        assert_eq!(
            format_amount(Decimal::from(1_000_000), Currency::AMD),
            "1,000,000 ֏"
        );
    }
}
