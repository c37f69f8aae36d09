//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! Every page lives under a locale prefix (`en` or `ar`). Unprefixed paths
//! are redirected by the locale middleware.
//!
//! ```text
//! GET  /health                     - Liveness
//! GET  /health/ready               - Readiness (database probe)
//!
//! # Catalog
//! GET  /{locale}                   - Product listing
//! GET  /{locale}/products/{id}     - Product detail
//!
//! # Cart (HTMX fragments, plain redirects without HTMX)
//! GET  /{locale}/cart              - Cart page
//! POST /{locale}/cart/add          - Add one unit (triggers cart-updated)
//! POST /{locale}/cart/update       - Set quantity (returns cart_items fragment)
//! POST /{locale}/cart/remove       - Remove line (returns cart_items fragment)
//! POST /{locale}/cart/clear        - Remove every line
//! POST /{locale}/cart/toggle       - Open or close the cart drawer
//! POST /{locale}/cart/close        - Close the cart drawer
//! GET  /{locale}/cart/drawer       - Cart drawer (fragment)
//! GET  /{locale}/cart/count        - Cart count badge (fragment)
//!
//! # Checkout
//! POST /{locale}/checkout          - Redirect to the WhatsApp order link
//! ```

pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use souq_core::Locale;

use crate::state::AppState;

/// Path parameters for routes nested under `/{locale}`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LocalePath {
    pub locale: Locale,
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/toggle", post(cart::toggle))
        .route("/close", post(cart::close))
        .route("/drawer", get(cart::drawer))
        .route("/count", get(cart::count))
}

/// Create the routes served under one locale prefix.
pub fn localized_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/products/{id}", get(products::show))
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
}

/// Build the complete router for all storefront routes.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/{locale}", localized_routes())
}
