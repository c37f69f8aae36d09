//! Persistence contract for cart state.
//!
//! The engine itself never touches storage. A [`CartStore`] is handed the
//! whole [`CartState`] after each mutation and asked for it once when a
//! session starts. Backends (session storage, an in-process cache, a remote
//! key-value service) implement this trait and nothing else.

use std::future::Future;

use super::CartState;

/// Fixed key the cart is stored under.
pub const CART_STORE_KEY: &str = "cart-store";

/// Errors a cart store backend can report.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// State could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Durable key-value storage for cart state.
pub trait CartStore: Send + Sync {
    /// Read the state stored under `key`, or `None` if nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read or the stored value
    /// is not a valid cart.
    fn load(&self, key: &str) -> impl Future<Output = Result<Option<CartState>, StoreError>> + Send;

    /// Replace the state stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the state cannot be encoded or written.
    fn save(
        &self,
        key: &str,
        state: &CartState,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
