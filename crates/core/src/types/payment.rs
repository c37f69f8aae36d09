//! Payment methods offered at checkout.

use serde::{Deserialize, Serialize};

/// Payment method chosen by the shopper before checkout.
///
/// The set is closed: a checkout request without one of these values is
/// rejected before any order message is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Tether stablecoin transfer.
    #[serde(rename = "USDT")]
    Usdt,
    /// `PayPal` transfer.
    #[serde(rename = "PayPal")]
    PayPal,
}

impl PaymentMethod {
    /// All payment methods in display order.
    pub const ALL: [Self; 2] = [Self::Usdt, Self::PayPal];

    /// The label used in order messages and form values.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Usdt => "USDT",
            Self::PayPal => "PayPal",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usdt" => Ok(Self::Usdt),
            "paypal" => Ok(Self::PayPal),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_from_str_is_case_insensitive() {
        assert_eq!("USDT".parse::<PaymentMethod>().unwrap(), PaymentMethod::Usdt);
        assert_eq!("paypal".parse::<PaymentMethod>().unwrap(), PaymentMethod::PayPal);
        assert_eq!("PayPal".parse::<PaymentMethod>().unwrap(), PaymentMethod::PayPal);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
        assert!("".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_payment_method_serde_uses_labels() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Usdt).unwrap(), "\"USDT\"");
        let parsed: PaymentMethod = serde_json::from_str("\"PayPal\"").unwrap();
        assert_eq!(parsed, PaymentMethod::PayPal);
    }
}
