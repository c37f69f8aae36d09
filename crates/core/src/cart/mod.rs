//! Shopping cart state and the engine that mutates it.
//!
//! The cart is a list of line items keyed by product id. Adding a product
//! that is already in the cart bumps its quantity; the name, price, image and
//! description captured on the first add are kept for the life of the line.
//!
//! # Hydration
//!
//! A [`CartEngine`] starts out [`Hydration::NotHydrated`]. Until
//! [`CartEngine::hydrate`] is called with whatever the [`store::CartStore`]
//! returned, every read reports an empty cart. This lets a page render before
//! the persisted cart has been loaded without showing stale or partial totals.
//!
//! ```
//! use rust_decimal::Decimal;
//! use souq_core::{CartEngine, ProductId, ProductSnapshot};
//!
//! let mut cart = CartEngine::new();
//! cart.hydrate(None);
//!
//! let canva = ProductSnapshot {
//!     id: ProductId::new(2),
//!     name: "Canva Pro".to_string(),
//!     price: Decimal::new(1200, 2),
//!     image_url: "/products/canva.jpeg".to_string(),
//!     description: String::new(),
//! };
//! cart.add_item(canva.clone());
//! cart.add_item(canva);
//!
//! assert_eq!(cart.total_items(), 2);
//! assert_eq!(cart.total_price(), Decimal::new(2400, 2));
//! ```

pub mod store;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Product fields captured when a product is first added to the cart.
///
/// The catalog is never consulted again for a line that is already in the
/// cart, so later price changes do not reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image_url: String,
    pub description: String,
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product id; unique within a cart.
    pub id: ProductId,
    pub name: String,
    /// Unit price at add-time.
    pub price: Decimal,
    pub image_url: String,
    pub description: String,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// Create a line with quantity 1 from a catalog snapshot.
    #[must_use]
    pub fn from_snapshot(product: ProductSnapshot) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
            description: product.description,
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Full cart contents as persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    /// Line items in the order they were first added.
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Whether the cart panel is open. Presentation only.
    #[serde(default)]
    pub is_open: bool,
}

impl CartState {
    /// Restore the one-line-per-product invariant on state read from storage.
    ///
    /// Duplicate lines are merged into the first one (quantities summed,
    /// first snapshot kept) and zero-quantity lines are dropped.
    #[must_use]
    pub fn normalized(self) -> Self {
        let mut items: Vec<CartItem> = Vec::with_capacity(self.items.len());
        for item in self.items {
            if item.quantity == 0 {
                continue;
            }
            match items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => items.push(item),
            }
        }
        Self {
            items,
            is_open: self.is_open,
        }
    }
}

/// Whether persisted state has been loaded into the engine yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hydration {
    #[default]
    NotHydrated,
    Hydrated,
}

/// In-memory cart with deterministic mutation rules.
///
/// Mutations never fail. Each returns `true` when the state changed, which
/// callers use to decide whether the cart needs to be persisted.
#[derive(Debug, Clone, Default)]
pub struct CartEngine {
    state: CartState,
    hydration: Hydration,
}

impl CartEngine {
    /// Create an empty engine that has not been hydrated.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine that is already hydrated with `state`.
    #[must_use]
    pub fn with_state(state: CartState) -> Self {
        Self {
            state: state.normalized(),
            hydration: Hydration::Hydrated,
        }
    }

    #[must_use]
    pub const fn hydration(&self) -> Hydration {
        self.hydration
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.hydration == Hydration::Hydrated
    }

    /// Load persisted state. Only the first call has any effect.
    ///
    /// `None` means nothing was stored and the cart stays as it is. Returns
    /// whether this call performed the hydration.
    pub fn hydrate(&mut self, loaded: Option<CartState>) -> bool {
        if self.is_hydrated() {
            tracing::debug!("cart already hydrated, ignoring loaded state");
            return false;
        }
        if let Some(state) = loaded {
            self.state = state.normalized();
        }
        self.hydration = Hydration::Hydrated;
        tracing::debug!(items = self.state.items.len(), "cart hydrated");
        true
    }

    /// Add one unit of a product.
    pub fn add_item(&mut self, product: ProductSnapshot) -> bool {
        match self.find_mut(product.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(1);
            }
            None => self.state.items.push(CartItem::from_snapshot(product)),
        }
        true
    }

    /// Remove a product's line. Absent ids are ignored.
    pub fn remove_item(&mut self, id: ProductId) -> bool {
        let before = self.state.items.len();
        self.state.items.retain(|item| item.id != id);
        self.state.items.len() != before
    }

    /// Set a line's quantity. Zero or negative removes the line.
    ///
    /// Values above `u32::MAX` are stored as `u32::MAX`. Callers taking
    /// quantities from user input should bound them first.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.find_mut(id) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Remove every line. The panel flag is left alone.
    pub fn clear_cart(&mut self) -> bool {
        let changed = !self.state.items.is_empty();
        self.state.items.clear();
        changed
    }

    pub fn set_is_open(&mut self, is_open: bool) -> bool {
        let changed = self.state.is_open != is_open;
        self.state.is_open = is_open;
        changed
    }

    pub fn toggle_cart(&mut self) -> bool {
        self.state.is_open = !self.state.is_open;
        true
    }

    /// Line items, empty until hydrated.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        if self.is_hydrated() {
            &self.state.items
        } else {
            &[]
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// The line for a product, if present and hydrated.
    #[must_use]
    pub fn get_item(&self, id: ProductId) -> Option<&CartItem> {
        self.items().iter().find(|item| item.id == id)
    }

    /// Sum of all quantities; 0 until hydrated.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items()
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Sum of `price * quantity`; 0 until hydrated.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items().iter().map(CartItem::subtotal).sum()
    }

    /// The full state, regardless of hydration. This is what gets persisted.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    fn find_mut(&mut self, id: ProductId) -> Option<&mut CartItem> {
        self.state.items.iter_mut().find(|item| item.id == id)
    }
}
