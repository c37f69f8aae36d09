//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Cart engine with write-through persistence and checkout

pub mod cart;

pub use cart::{CartService, CheckoutError, MemoryCartStore, SessionCartStore};
