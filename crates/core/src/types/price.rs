//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are stored per currency (one column per currency), and the
//! active [`Locale`](super::Locale) decides which one a shopper sees. Totals
//! are never converted between currencies.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places used when displaying money.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
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

    /// Format for display (e.g., "$19.99" or "SAR 75.00").
    #[must_use]
    pub fn display(&self) -> String {
        self.currency_code.format(self.amount)
    }
}

/// ISO 4217 currency codes the storefront sells in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    SAR,
}

impl CurrencyCode {
    /// Display symbol placed before the amount.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::SAR => "SAR ",
        }
    }

    /// The three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::SAR => "SAR",
        }
    }

    /// Format an amount in this currency with exactly two decimal places.
    #[must_use]
    pub fn format(&self, amount: Decimal) -> String {
        format!("{}{}", self.symbol(), format_amount(amount))
    }
}

/// Format an amount with exactly two decimal places.
///
/// Midpoints round away from zero, so `0.125` becomes `0.13`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(
        MONEY_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    );
    rounded.rescale(MONEY_DECIMAL_PLACES);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap_or_default()
    }

    #[test]
    fn test_format_amount_pads_whole_numbers() {
        assert_eq!(format_amount(dec("10")), "10.00");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_format_amount_rounds_midpoint_away_from_zero() {
        assert_eq!(format_amount(dec("0.125")), "0.13");
        assert_eq!(format_amount(dec("19.994")), "19.99");
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::new(dec("19.9"), CurrencyCode::USD).display(), "$19.90");
        assert_eq!(Price::new(dec("75"), CurrencyCode::SAR).display(), "SAR 75.00");
    }
}
