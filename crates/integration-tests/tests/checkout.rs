//! Order summary, message formatting and deep links built from a real cart.

use rust_decimal::Decimal;
use souq_core::{
    CurrencyCode, DeepLinkError, OrderSummary, PaymentMethod, build_deep_link_url, format_message,
};
use souq_integration_tests::{order_number, snapshot};
use souq_storefront::services::{CartService, CheckoutError, MemoryCartStore};

async fn sample_cart() -> CartService<MemoryCartStore> {
    let mut cart = CartService::load(MemoryCartStore::default()).await;
    cart.add_item(snapshot(1, "ChatGPT", "15")).await;
    cart.add_item(snapshot(2, "Canva", "10")).await;
    cart.add_item(snapshot(1, "ChatGPT", "15")).await;
    cart
}

#[tokio::test]
async fn test_summary_matches_cart_totals() {
    let cart = sample_cart().await;
    let summary = OrderSummary::build(cart.items(), PaymentMethod::PayPal);

    let manual_items: u64 = cart.items().iter().map(|i| u64::from(i.quantity)).sum();
    let manual_price: Decimal = cart.items().iter().map(|i| i.price * Decimal::from(i.quantity)).sum();

    assert_eq!(summary.total_items, manual_items);
    assert_eq!(summary.total_price, manual_price);
    assert_eq!(summary.total_items, cart.total_items());
    assert_eq!(summary.total_price, Decimal::from(40));
}

#[tokio::test]
async fn test_message_names_method_and_each_item_once() {
    let cart = sample_cart().await;
    let message = format_message(&OrderSummary::build(cart.items(), PaymentMethod::PayPal));

    assert!(message.contains("PayPal"));
    assert_eq!(message.matches("ChatGPT").count(), 1);
    assert_eq!(message.matches("Canva").count(), 1);
    assert!(message.find("ChatGPT") < message.find("Canva"));
    assert!(message.contains("$40.00"));
}

#[tokio::test]
async fn test_message_is_deterministic() {
    let cart = sample_cart().await;
    let first = cart.order_summary(PaymentMethod::Usdt, CurrencyCode::USD).message();
    let second = cart.order_summary(PaymentMethod::Usdt, CurrencyCode::USD).message();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_checkout_link_encodes_message() {
    let cart = sample_cart().await;
    let link = cart
        .checkout_link(PaymentMethod::Usdt, CurrencyCode::SAR, &order_number())
        .unwrap();

    let encoded = link
        .strip_prefix("https://wa.me/967780065525?text=")
        .unwrap();
    assert!(!encoded.contains(' '));
    assert!(!encoded.contains('\n'));

    let decoded = urlencoding::decode(encoded).unwrap();
    assert_eq!(
        decoded,
        cart.order_summary(PaymentMethod::Usdt, CurrencyCode::SAR).message()
    );
    assert!(decoded.contains("SAR 40.00"));
}

#[tokio::test]
async fn test_empty_cart_has_no_checkout_link() {
    let cart = CartService::load(MemoryCartStore::default()).await;
    assert_eq!(
        cart.checkout_link(PaymentMethod::PayPal, CurrencyCode::USD, &order_number()),
        Err(CheckoutError::EmptyCart)
    );
}

#[test]
fn test_deep_link_requires_destination_digits() {
    assert_eq!(
        build_deep_link_url("hello", "call me"),
        Err(DeepLinkError::EmptyDestination)
    );
    assert_eq!(
        build_deep_link_url("hi there", "+1 (555) 010-9999").unwrap(),
        "https://wa.me/15550109999?text=hi%20there"
    );
}
