//! Order summaries and the checkout message sent to the shop.
//!
//! Checkout does not create an order record. The cart is turned into an
//! [`OrderSummary`], rendered as a text message, and handed to a messaging
//! deep link that opens a chat with the shop with the message prefilled.
//!
//! All functions here are pure: the same cart and payment method always give
//! byte-identical output.

use std::fmt::Write as _;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::types::phone::normalize_digits;
use crate::types::{CurrencyCode, PaymentMethod, PhoneNumber};

/// Base URL of the messaging deep link.
pub const DEEP_LINK_BASE: &str = "https://wa.me/";

/// Errors building a deep link.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeepLinkError {
    /// The destination has no digits left after normalization.
    #[error("deep link destination must contain digits")]
    EmptyDestination,
}

/// Snapshot of a cart at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Lines in cart order.
    pub items: Vec<CartItem>,
    pub total_items: u64,
    pub total_price: Decimal,
    pub payment_method: PaymentMethod,
    /// Currency the cart prices were captured in.
    #[serde(default)]
    pub currency: CurrencyCode,
}

impl OrderSummary {
    /// Compute totals for `items` with the chosen payment method.
    ///
    /// Prices are assumed to be in USD; use [`Self::in_currency`] for carts
    /// priced in another currency.
    #[must_use]
    pub fn build(items: &[CartItem], payment_method: PaymentMethod) -> Self {
        Self {
            items: items.to_vec(),
            total_items: items.iter().map(|item| u64::from(item.quantity)).sum(),
            total_price: items.iter().map(CartItem::subtotal).sum(),
            payment_method,
            currency: CurrencyCode::default(),
        }
    }

    /// Label amounts with `currency`. No conversion is performed.
    #[must_use]
    pub fn in_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    /// Render the checkout message.
    #[must_use]
    pub fn message(&self) -> String {
        format_message(self)
    }

    /// Deep link that opens a chat with `destination` and this order's message.
    #[must_use]
    pub fn deep_link(&self, destination: &PhoneNumber) -> String {
        deep_link_for_digits(&self.message(), destination.digits())
    }
}

/// Render an order summary as a multi-line chat message.
///
/// Items are listed in the order given, each with unit price, quantity and
/// subtotal. Amounts always carry two decimal places.
#[must_use]
pub fn format_message(summary: &OrderSummary) -> String {
    let currency = summary.currency;
    let total = currency.format(summary.total_price);
    let mut message = String::new();

    // Writing to a String cannot fail.
    let _ = write!(
        message,
        "🛒 *New Order Request*\n\n\
         📋 *Order Details:*\n\
         • Total Items: {}\n\
         • Payment Method: {}\n\
         • Total Amount: {total}\n\n\
         📦 *Items in Order:*\n",
        summary.total_items, summary.payment_method,
    );

    for (index, item) in summary.items.iter().enumerate() {
        let _ = write!(
            message,
            "{}. *{}*\n   Price: {}\n   Quantity: {}\n   Subtotal: {}\n\n",
            index + 1,
            item.name,
            currency.format(item.price),
            item.quantity,
            currency.format(item.subtotal()),
        );
    }

    let _ = write!(
        message,
        "💰 *Payment Information:*\n\
         • Selected Method: {}\n\
         • Total Amount: {total}\n\n\
         Please contact the customer to complete the payment process.",
        summary.payment_method,
    );

    message
}

/// Build a messaging deep link carrying `message`.
///
/// Every non-digit character is stripped from `destination`, so
/// `"+967 780-065-525"` targets `967780065525`.
///
/// The message is percent-encoded with only `A-Z a-z 0-9 - _ . ~` left as is.
/// Browsers' `encodeURIComponent` also leaves `! ' ( ) *` alone, so links are
/// not byte-identical to one built that way, but both decode to the same
/// text.
///
/// # Errors
///
/// Returns `DeepLinkError::EmptyDestination` if `destination` has no digits.
pub fn build_deep_link_url(message: &str, destination: &str) -> Result<String, DeepLinkError> {
    let digits = normalize_digits(destination);
    if digits.is_empty() {
        return Err(DeepLinkError::EmptyDestination);
    }
    Ok(deep_link_for_digits(message, &digits))
}

fn deep_link_for_digits(message: &str, digits: &str) -> String {
    format!(
        "{DEEP_LINK_BASE}{digits}?text={}",
        urlencoding::encode(message)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::ProductId;

    fn item(id: i32, name: &str, price: Decimal, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: name.to_string(),
            price,
            image_url: String::new(),
            description: String::new(),
            quantity,
        }
    }

    fn sample_items() -> Vec<CartItem> {
        vec![
            item(1, "ChatGPT Plus", Decimal::from(20), 2),
            item(2, "Canva Pro", Decimal::new(1250, 2), 1),
        ]
    }

    #[test]
    fn test_build_computes_totals() {
        let summary = OrderSummary::build(&sample_items(), PaymentMethod::PayPal);
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.total_price, Decimal::new(5250, 2));
        assert_eq!(summary.payment_method, PaymentMethod::PayPal);
        assert_eq!(summary.items, sample_items());
    }

    #[test]
    fn test_build_empty_cart() {
        let summary = OrderSummary::build(&[], PaymentMethod::Usdt);
        assert_eq!(summary.total_items, 0);
        assert_eq!(summary.total_price, Decimal::ZERO);
        assert!(format_message(&summary).contains("• Total Amount: $0.00"));
    }

    #[test]
    fn test_message_layout() {
        let summary = OrderSummary::build(&sample_items(), PaymentMethod::PayPal);
        let expected = "🛒 *New Order Request*\n\n\
            📋 *Order Details:*\n\
            • Total Items: 3\n\
            • Payment Method: PayPal\n\
            • Total Amount: $52.50\n\n\
            📦 *Items in Order:*\n\
            1. *ChatGPT Plus*\n   Price: $20.00\n   Quantity: 2\n   Subtotal: $40.00\n\n\
            2. *Canva Pro*\n   Price: $12.50\n   Quantity: 1\n   Subtotal: $12.50\n\n\
            💰 *Payment Information:*\n\
            • Selected Method: PayPal\n\
            • Total Amount: $52.50\n\n\
            Please contact the customer to complete the payment process.";

        assert_eq!(format_message(&summary), expected);
    }

    #[test]
    fn test_message_lists_each_item_once_in_order() {
        let summary = OrderSummary::build(&sample_items(), PaymentMethod::PayPal);
        let message = summary.message();

        assert!(message.contains("PayPal"));
        assert_eq!(message.matches("ChatGPT Plus").count(), 1);
        assert_eq!(message.matches("Canva Pro").count(), 1);

        let first = message.find("ChatGPT Plus").unwrap();
        let second = message.find("Canva Pro").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_message_is_deterministic() {
        let summary = OrderSummary::build(&sample_items(), PaymentMethod::Usdt);
        let again = OrderSummary::build(&sample_items(), PaymentMethod::Usdt);
        assert_eq!(format_message(&summary), format_message(&again));
        assert_eq!(summary.message(), summary.message());
    }

    #[test]
    fn test_message_uses_cart_currency() {
        let summary = OrderSummary::build(&sample_items(), PaymentMethod::Usdt)
            .in_currency(CurrencyCode::SAR);
        let message = summary.message();
        assert!(message.contains("Price: SAR 20.00"));
        assert!(message.contains("• Total Amount: SAR 52.50"));
        assert!(!message.contains('$'));
    }

    #[test]
    fn test_deep_link_strips_non_digits_and_encodes() {
        let url = build_deep_link_url("Hi there & welcome", "+967 780-065-525").unwrap();
        assert_eq!(url, "https://wa.me/967780065525?text=Hi%20there%20%26%20welcome");
    }

    #[test]
    fn test_deep_link_encodes_newlines_and_emoji() {
        let url = build_deep_link_url("🛒\n*x*", "967780065525").unwrap();
        let query = url.split_once("?text=").unwrap().1;
        assert!(!query.contains('\n'));
        assert!(query.starts_with("%F0%9F%9B%92%0A"));
        assert_eq!(urlencoding::decode(query).unwrap(), "🛒\n*x*");
    }

    #[test]
    fn test_deep_link_escapes_everything_but_unreserved() {
        let url = build_deep_link_url("*Total* (2)! it's a-b_c.d~", "967780065525").unwrap();
        assert_eq!(
            url,
            "https://wa.me/967780065525?text=%2ATotal%2A%20%282%29%21%20it%27s%20a-b_c.d~"
        );
    }

    #[test]
    fn test_deep_link_requires_digits() {
        assert_eq!(
            build_deep_link_url("hello", "+ ( )"),
            Err(DeepLinkError::EmptyDestination)
        );
    }

    #[test]
    fn test_summary_deep_link_matches_free_function() {
        let summary = OrderSummary::build(&sample_items(), PaymentMethod::PayPal);
        let phone = PhoneNumber::parse("+967780065525").unwrap();
        assert_eq!(
            summary.deep_link(&phone),
            build_deep_link_url(&summary.message(), "+967780065525").unwrap()
        );
    }
}
