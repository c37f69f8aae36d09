//! `CartStore` backends.
//!
//! - [`SessionCartStore`] keeps the cart in the visitor's tower-sessions
//!   record, which the session layer writes to `PostgreSQL`.
//! - [`MemoryCartStore`] keeps carts in a process-local `moka` cache. The
//!   server never uses it; it backs tests and callers that embed the cart
//!   service without a session.

use std::time::Duration;

use moka::future::Cache;
use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

use souq_core::{CartState, CartStore, StoreError};

/// Cart storage backed by the request's session.
#[derive(Clone)]
pub struct SessionCartStore {
    session: Session,
}

impl SessionCartStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

/// Keep encode/decode failures apart from session backend failures.
fn store_error(err: SessionError) -> StoreError {
    match err {
        SessionError::SerdeJson(e) => StoreError::Serialization(e),
        SessionError::Store(e) => StoreError::Backend(e.to_string()),
    }
}

impl CartStore for SessionCartStore {
    async fn load(&self, key: &str) -> Result<Option<CartState>, StoreError> {
        self.session.get::<CartState>(key).await.map_err(store_error)
    }

    async fn save(&self, key: &str, state: &CartState) -> Result<(), StoreError> {
        self.session.insert(key, state).await.map_err(store_error)
    }
}

/// Default number of carts the memory store holds.
const DEFAULT_MAX_CARTS: u64 = 10_000;

/// Idle carts are evicted on the same schedule as idle sessions.
const DEFAULT_TIME_TO_IDLE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// In-memory cart storage.
///
/// Clones share the same cache.
#[derive(Clone)]
pub struct MemoryCartStore {
    cache: Cache<String, CartState>,
}

impl MemoryCartStore {
    #[must_use]
    pub fn new(max_capacity: u64, time_to_idle: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_idle(time_to_idle)
            .build();

        Self { cache }
    }

    /// The state currently saved under `key`.
    pub async fn get(&self, key: &str) -> Option<CartState> {
        self.cache.get(key).await
    }
}

impl Default for MemoryCartStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CARTS, DEFAULT_TIME_TO_IDLE)
    }
}

impl CartStore for MemoryCartStore {
    async fn load(&self, key: &str) -> Result<Option<CartState>, StoreError> {
        Ok(self.cache.get(key).await)
    }

    async fn save(&self, key: &str, state: &CartState) -> Result<(), StoreError> {
        self.cache.insert(key.to_string(), state.clone()).await;
        Ok(())
    }
}
