//! Session-related types.
//!
//! The session is the cart's durable store: one cart per browser session and
//! locale, serialized under a locale-suffixed key.

use souq_core::{CART_STORE_KEY, Locale};

/// Session keys.
pub mod keys {
    /// Key for the shopper's last visited locale.
    pub const LOCALE: &str = "locale";
}

/// Session key for the cart of `locale`.
///
/// Each locale prices in its own currency, so carts are kept apart.
#[must_use]
pub fn cart_key(locale: Locale) -> String {
    format!("{CART_STORE_KEY}:{}", locale.code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_key_per_locale() {
        assert_eq!(cart_key(Locale::En), "cart-store:en");
        assert_eq!(cart_key(Locale::Ar), "cart-store:ar");
    }
}
