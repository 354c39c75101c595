//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are decimal amounts in the currency's standard unit
//! (reais, dollars). Payment processors want integer minor units
//! (centavos, cents), so conversion happens once, at the checkout boundary.

use core::fmt;
use core::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Minor units per standard unit for every supported currency.
const MINOR_UNITS_PER_UNIT: i64 = 100;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., reais, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Convert to the processor's integer minor-unit representation.
    ///
    /// Multiplies by 100 and rounds half away from zero, so `129.99`
    /// becomes `12999` and `0.005` becomes `1`.
    ///
    /// Returns `None` if the result does not fit in an `i64`.
    #[must_use]
    pub fn to_minor_units(&self) -> Option<i64> {
        to_minor_units(self.amount)
    }

    /// Format for display (e.g., "R$ 89.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Convert a standard-unit amount to minor units.
///
/// See [`Price::to_minor_units`].
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::from(MINOR_UNITS_PER_UNIT))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol, including trailing space where the locale uses one.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::BRL => "R$ ",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Upper-case ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BRL => "BRL",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }

    /// Lower-case code as payment processors expect it (e.g. `brl`).
    #[must_use]
    pub fn processor_code(&self) -> String {
        self.code().to_ascii_lowercase()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unsupported currency code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BRL" => Ok(Self::BRL),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            _ => Err(UnknownCurrency(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units_exact() {
        let price = Price::new(Decimal::new(12999, 2), CurrencyCode::BRL);
        assert_eq!(price.to_minor_units(), Some(12999));
    }

    #[test]
    fn test_minor_units_rounds_half_away_from_zero() {
        assert_eq!(to_minor_units(Decimal::new(1005, 3)), Some(101));
        assert_eq!(to_minor_units(Decimal::new(1004, 3)), Some(100));
        assert_eq!(to_minor_units(Decimal::new(5, 3)), Some(1));
    }

    #[test]
    fn test_minor_units_overflow() {
        assert_eq!(to_minor_units(Decimal::MAX), None);
    }

    #[test]
    fn test_display() {
        let price = Price::new(Decimal::new(8999, 2), CurrencyCode::BRL);
        assert_eq!(price.to_string(), "R$ 89.99");

        let price = Price::new(Decimal::from(5), CurrencyCode::USD);
        assert_eq!(price.to_string(), "$5.00");
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("brl".parse::<CurrencyCode>().unwrap(), CurrencyCode::BRL);
        assert_eq!(CurrencyCode::BRL.processor_code(), "brl");
        assert!("xyz".parse::<CurrencyCode>().is_err());
    }
}
