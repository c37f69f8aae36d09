//! Cart service: the cart engine plus write-through persistence.
//!
//! Each request builds a [`CartService`] over a [`CartStore`], hydrates it
//! once, and then mutates it. Every mutation that changes the cart is saved
//! before the call returns. A failed save is logged and reported to Sentry as
//! a breadcrumb, and the in-memory change stands: the shopper keeps a working
//! cart for the rest of the request even when storage is down.

mod stores;

use rust_decimal::Decimal;
use souq_core::{
    CART_STORE_KEY, CartEngine, CartItem, CartState, CartStore, CurrencyCode, OrderSummary,
    PaymentMethod, PhoneNumber, ProductId, ProductSnapshot,
};

pub use stores::{MemoryCartStore, SessionCartStore};

use crate::error::add_breadcrumb;

/// Reasons checkout cannot produce a deep link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,
}

/// A cart engine bound to a store.
pub struct CartService<S> {
    engine: CartEngine,
    store: S,
    key: String,
}

impl<S: CartStore> CartService<S> {
    /// Create a service over `store` using the default cart key.
    ///
    /// The cart is not hydrated; call [`Self::rehydrate`] before reading it.
    #[must_use]
    pub fn open(store: S) -> Self {
        Self::with_key(store, CART_STORE_KEY)
    }

    /// Create a service that stores the cart under `key`.
    #[must_use]
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            engine: CartEngine::new(),
            store,
            key: key.into(),
        }
    }

    /// Open and hydrate in one step.
    pub async fn load(store: S) -> Self {
        let mut service = Self::open(store);
        service.rehydrate().await;
        service
    }

    /// Load the persisted cart into the engine.
    ///
    /// A load failure is not fatal: the cart starts empty. Returns whether
    /// this call hydrated the engine.
    pub async fn rehydrate(&mut self) -> bool {
        if self.engine.is_hydrated() {
            return false;
        }

        let loaded = match self.store.load(&self.key).await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to load cart, starting empty");
                add_breadcrumb("cart", "Cart load failed", Some(&[("key", self.key.as_str())]));
                None
            }
        };

        self.engine.hydrate(loaded)
    }

    /// Add one unit of a product.
    pub async fn add_item(&mut self, product: ProductSnapshot) -> bool {
        let changed = self.engine.add_item(product);
        self.persist_if(changed).await
    }

    /// Remove a product's line. Absent ids are ignored.
    pub async fn remove_item(&mut self, id: ProductId) -> bool {
        let changed = self.engine.remove_item(id);
        self.persist_if(changed).await
    }

    /// Set a line's quantity; zero or negative removes it.
    pub async fn update_quantity(&mut self, id: ProductId, quantity: i64) -> bool {
        let changed = self.engine.update_quantity(id, quantity);
        self.persist_if(changed).await
    }

    /// Remove every line.
    pub async fn clear_cart(&mut self) -> bool {
        let changed = self.engine.clear_cart();
        self.persist_if(changed).await
    }

    pub async fn set_is_open(&mut self, is_open: bool) -> bool {
        let changed = self.engine.set_is_open(is_open);
        self.persist_if(changed).await
    }

    pub async fn toggle_cart(&mut self) -> bool {
        let changed = self.engine.toggle_cart();
        self.persist_if(changed).await
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.engine.items()
    }

    #[must_use]
    pub fn get_item(&self, id: ProductId) -> Option<&CartItem> {
        self.engine.get_item(id)
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.engine.total_items()
    }

    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.engine.total_price()
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.engine.is_open()
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.engine.is_hydrated()
    }

    /// The state as it would be persisted.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        self.engine.state()
    }

    /// Summarize the cart for checkout.
    #[must_use]
    pub fn order_summary(
        &self,
        payment_method: PaymentMethod,
        currency: CurrencyCode,
    ) -> OrderSummary {
        OrderSummary::build(self.items(), payment_method).in_currency(currency)
    }

    /// Deep link that sends this cart's order message to `destination`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines.
    pub fn checkout_link(
        &self,
        payment_method: PaymentMethod,
        currency: CurrencyCode,
        destination: &PhoneNumber,
    ) -> Result<String, CheckoutError> {
        if self.items().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let summary = self.order_summary(payment_method, currency);
        tracing::info!(
            total_items = summary.total_items,
            total_price = %summary.total_price,
            payment_method = %payment_method,
            "checkout link built"
        );
        Ok(summary.deep_link(destination))
    }

    async fn persist_if(&self, changed: bool) -> bool {
        if changed {
            self.persist().await;
        }
        changed
    }

    async fn persist(&self) {
        if let Err(e) = self.store.save(&self.key, self.engine.state()).await {
            tracing::warn!(
                key = %self.key,
                error = %e,
                "failed to persist cart, keeping in-memory state"
            );
            add_breadcrumb("cart", "Cart save failed", Some(&[("key", self.key.as_str())]));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use souq_core::StoreError;

    use super::*;

    fn product(id: i32, price: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::from(price),
            image_url: String::new(),
            description: String::new(),
        }
    }

    /// Store whose reads and writes always fail.
    #[derive(Default)]
    struct BrokenStore {
        saves: AtomicUsize,
    }

    impl CartStore for BrokenStore {
        async fn load(&self, _key: &str) -> Result<Option<CartState>, StoreError> {
            Err(StoreError::Backend("offline".to_string()))
        }

        async fn save(&self, _key: &str, _state: &CartState) -> Result<(), StoreError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Backend("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_mutations_are_written_through() {
        let store = MemoryCartStore::default();
        let mut cart = CartService::load(store.clone()).await;

        cart.add_item(product(1, 10)).await;
        cart.add_item(product(1, 10)).await;

        let saved = store.get(CART_STORE_KEY).await.unwrap();
        assert_eq!(saved.items.len(), 1);
        assert_eq!(saved.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_rehydrate_restores_saved_cart() {
        let store = MemoryCartStore::default();
        {
            let mut cart = CartService::load(store.clone()).await;
            cart.add_item(product(1, 5)).await;
            cart.add_item(product(1, 5)).await;
            cart.add_item(product(2, 3)).await;
        }

        let cart = CartService::load(store).await;
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Decimal::from(13));
    }

    #[tokio::test]
    async fn test_reads_are_empty_before_rehydrate() {
        let store = MemoryCartStore::default();
        CartService::load(store.clone())
            .await
            .add_item(product(1, 5))
            .await;

        let mut cart = CartService::open(store);
        assert!(!cart.is_hydrated());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);

        assert!(cart.rehydrate().await);
        assert!(!cart.rehydrate().await);
        assert_eq!(cart.total_items(), 1);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_in_memory_change() {
        let mut cart = CartService::load(BrokenStore::default()).await;
        assert!(cart.is_hydrated());

        assert!(cart.add_item(product(1, 10)).await);
        assert!(cart.add_item(product(2, 4)).await);
        assert!(cart.update_quantity(ProductId::new(2), 3).await);

        assert_eq!(cart.total_items(), 4);
        assert_eq!(cart.total_price(), Decimal::from(22));
        assert_eq!(cart.store.saves.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_noop_mutations_do_not_write() {
        let mut cart = CartService::load(BrokenStore::default()).await;

        assert!(!cart.remove_item(ProductId::new(99)).await);
        assert!(!cart.update_quantity(ProductId::new(99), 2).await);
        assert!(!cart.clear_cart().await);
        assert_eq!(cart.store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_carts_under_different_keys_are_independent() {
        let store = MemoryCartStore::default();
        let mut first = CartService::with_key(store.clone(), "cart-store:a");
        first.rehydrate().await;
        first.add_item(product(1, 5)).await;

        let mut second = CartService::with_key(store, "cart-store:b");
        second.rehydrate().await;
        assert_eq!(second.total_items(), 0);
    }

    #[tokio::test]
    async fn test_checkout_link() {
        let mut cart = CartService::load(MemoryCartStore::default()).await;
        let phone = PhoneNumber::parse("+967780065525").unwrap();

        assert_eq!(
            cart.checkout_link(PaymentMethod::Usdt, CurrencyCode::USD, &phone),
            Err(CheckoutError::EmptyCart)
        );

        cart.add_item(product(1, 10)).await;
        let link = cart
            .checkout_link(PaymentMethod::PayPal, CurrencyCode::USD, &phone)
            .unwrap();
        assert!(link.starts_with("https://wa.me/967780065525?text="));
        assert!(link.contains("PayPal"));
    }

    #[tokio::test]
    async fn test_order_summary_uses_currency() {
        let mut cart = CartService::load(MemoryCartStore::default()).await;
        cart.add_item(product(1, 75)).await;

        let summary = cart.order_summary(PaymentMethod::Usdt, CurrencyCode::SAR);
        assert_eq!(summary.total_price, Decimal::from(75));
        assert!(summary.message().contains("SAR 75.00"));
    }
}
