//! Cart engine behaviour behind the write-through service.

use std::sync::Arc;

use rust_decimal::Decimal;
use souq_core::{CART_STORE_KEY, CartEngine, CartState, CartStore, ProductId, StoreError};
use souq_integration_tests::snapshot;
use souq_storefront::services::{CartService, MemoryCartStore, SessionCartStore};
use tower_sessions::{MemoryStore, Session};

/// Store that starts empty and rejects every write.
struct ReadOnlyStore;

impl CartStore for ReadOnlyStore {
    async fn load(&self, _key: &str) -> Result<Option<CartState>, StoreError> {
        Ok(None)
    }

    async fn save(&self, _key: &str, _state: &CartState) -> Result<(), StoreError> {
        Err(StoreError::Backend("read-only".to_string()))
    }
}

#[tokio::test]
async fn test_repeated_add_increments_quantity() {
    let mut cart = CartService::load(MemoryCartStore::default()).await;

    cart.add_item(snapshot(1, "A", "10")).await;
    cart.add_item(snapshot(1, "A", "10")).await;

    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].quantity, 2);
    assert_eq!(cart.items()[0].price, Decimal::from(10));
    assert_eq!(cart.total_items(), 2);
    assert_eq!(cart.total_price(), Decimal::from(20));
}

#[tokio::test]
async fn test_total_price_sums_lines() {
    let mut cart = CartService::load(MemoryCartStore::default()).await;
    cart.add_item(snapshot(1, "A", "5")).await;
    cart.add_item(snapshot(1, "A", "5")).await;
    cart.add_item(snapshot(2, "B", "3")).await;

    assert_eq!(cart.total_price(), Decimal::from(13));
}

#[tokio::test]
async fn test_zero_quantity_removes_line() {
    let mut cart = CartService::load(MemoryCartStore::default()).await;
    cart.add_item(snapshot(1, "A", "5")).await;
    cart.add_item(snapshot(2, "B", "3")).await;

    assert!(cart.update_quantity(ProductId::new(1), 0).await);
    assert!(cart.get_item(ProductId::new(1)).is_none());

    assert!(cart.update_quantity(ProductId::new(2), -5).await);
    assert!(cart.items().is_empty());
}

#[tokio::test]
async fn test_removing_absent_item_is_a_noop() {
    let mut cart = CartService::load(MemoryCartStore::default()).await;
    cart.add_item(snapshot(1, "A", "5")).await;
    cart.add_item(snapshot(2, "B", "3")).await;
    let before = cart.state().clone();

    assert!(!cart.remove_item(ProductId::new(99)).await);
    assert_eq!(cart.state(), &before);

    assert!(cart.remove_item(ProductId::new(2)).await);
    assert!(!cart.remove_item(ProductId::new(2)).await);
}

#[tokio::test]
async fn test_clear_cart_empties_everything() {
    let mut cart = CartService::load(MemoryCartStore::default()).await;
    cart.add_item(snapshot(1, "A", "5")).await;
    cart.add_item(snapshot(2, "B", "3")).await;

    assert!(cart.clear_cart().await);
    assert!(cart.items().is_empty());
    assert_eq!(cart.total_items(), 0);
    assert_eq!(cart.total_price(), Decimal::ZERO);
}

#[tokio::test]
async fn test_first_snapshot_wins_on_repeat_add() {
    let mut cart = CartService::load(MemoryCartStore::default()).await;
    cart.add_item(snapshot(1, "Old name", "10")).await;
    cart.add_item(snapshot(1, "New name", "12")).await;

    let line = cart.get_item(ProductId::new(1)).unwrap();
    assert_eq!(line.name, "Old name");
    assert_eq!(line.price, Decimal::from(10));
    assert_eq!(line.quantity, 2);
}

#[tokio::test]
async fn test_items_keep_first_add_order() {
    let mut cart = CartService::load(MemoryCartStore::default()).await;
    cart.add_item(snapshot(3, "C", "1")).await;
    cart.add_item(snapshot(1, "A", "1")).await;
    cart.add_item(snapshot(3, "C", "1")).await;
    cart.add_item(snapshot(2, "B", "1")).await;

    let ids: Vec<i32> = cart.items().iter().map(|i| i.id.as_i32()).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[tokio::test]
async fn test_state_survives_a_new_service() {
    let store = MemoryCartStore::default();
    {
        let mut cart = CartService::load(store.clone()).await;
        cart.add_item(snapshot(1, "A", "2.50")).await;
        cart.add_item(snapshot(2, "B", "1.25")).await;
        cart.update_quantity(ProductId::new(2), 4).await;
        cart.set_is_open(true).await;
    }

    let cart = CartService::load(store).await;
    assert_eq!(cart.total_items(), 5);
    assert_eq!(cart.total_price(), Decimal::new(750, 2));
    assert!(cart.is_open());
}

#[tokio::test]
async fn test_session_store_round_trip() {
    let session = Session::new(None, Arc::new(MemoryStore::default()), None);
    {
        let mut cart = CartService::load(SessionCartStore::new(session.clone())).await;
        cart.add_item(snapshot(7, "Oud", "45.50")).await;
        cart.toggle_cart().await;
    }

    let stored: CartState = session.get(CART_STORE_KEY).await.unwrap().unwrap();
    assert_eq!(stored.items.len(), 1);
    assert!(stored.is_open);

    let cart = CartService::load(SessionCartStore::new(session)).await;
    assert_eq!(cart.state(), &stored);
}

#[tokio::test]
async fn test_unhydrated_cart_reads_empty() {
    let store = MemoryCartStore::default();
    CartService::load(store.clone())
        .await
        .add_item(snapshot(1, "A", "10"))
        .await;

    let cart = CartService::open(store);
    assert!(!cart.is_hydrated());
    assert!(cart.items().is_empty());
    assert_eq!(cart.total_items(), 0);
    assert_eq!(cart.total_price(), Decimal::ZERO);
}

#[tokio::test]
async fn test_write_failure_keeps_in_memory_cart() {
    let mut cart = CartService::load(ReadOnlyStore).await;

    assert!(cart.add_item(snapshot(1, "A", "10")).await);
    assert!(cart.add_item(snapshot(1, "A", "10")).await);
    assert!(cart.clear_cart().await);
    assert!(cart.add_item(snapshot(2, "B", "4")).await);

    assert_eq!(cart.total_items(), 1);
    assert_eq!(cart.total_price(), Decimal::from(4));
}

#[tokio::test]
async fn test_persisted_json_shape() {
    let mut engine = CartEngine::with_state(CartState::default());
    engine.add_item(snapshot(1, "A", "10"));
    engine.add_item(snapshot(1, "A", "10"));

    let json = serde_json::to_value(engine.state()).unwrap();
    assert_eq!(json["is_open"], false);
    assert_eq!(json["items"][0]["id"], 1);
    assert_eq!(json["items"][0]["quantity"], 2);
    assert_eq!(json["items"][0]["price"], "10");
    assert_eq!(json["items"][0]["image_url"], "/static/products/1.jpeg");
}
