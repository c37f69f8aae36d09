//! Souq Core - Shared types and the shopping cart.
//!
//! This crate is used by every Souq component:
//! - `storefront` - Public bilingual (English/Arabic) shop
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains types, the cart engine and pure formatting
//! functions. It performs no I/O: cart persistence is expressed as the
//! [`CartStore`] trait and implemented by the storefront.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, locales, phone numbers
//! - [`cart`] - Cart state, the cart engine and the store contract
//! - [`order`] - Order summaries, checkout messages and deep links

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod order;
pub mod types;

pub use cart::store::{CART_STORE_KEY, CartStore, StoreError};
pub use cart::{CartEngine, CartItem, CartState, Hydration, ProductSnapshot};
pub use order::{DeepLinkError, OrderSummary, build_deep_link_url, format_message};
pub use types::*;
