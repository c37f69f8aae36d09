//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session, one per locale, and is loaded into a
//! [`CartService`] at the start of each request.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use souq_core::{CartItem, CurrencyCode, Locale, PaymentMethod, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::i18n::PageContext;
use crate::models::session::cart_key;
use crate::routes::LocalePath;
use crate::services::{CartService, CheckoutError, SessionCartStore};
use crate::state::AppState;

/// HTMX event fired after any cart change so badges refresh.
const CART_UPDATED_TRIGGER: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Largest quantity a line can be set to from a form.
pub const MAX_QUANTITY: i64 = 9_999;

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    /// Quantity submitted by the "+" button.
    pub increment: i64,
    /// Quantity submitted by the "-" button; zero removes the line.
    pub decrement: i64,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
    pub is_open: bool,
}

impl CartView {
    /// Build the view of `items`, formatting money in `currency`.
    #[must_use]
    pub fn new(items: &[CartItem], currency: CurrencyCode, is_open: bool) -> Self {
        let total: Decimal = items.iter().map(CartItem::subtotal).sum();
        Self {
            items: items
                .iter()
                .map(|item| CartItemView::new(item, currency))
                .collect(),
            total: currency.format(total),
            item_count: items.iter().map(|item| u64::from(item.quantity)).sum(),
            is_open,
        }
    }

    fn of(cart: &CartService<SessionCartStore>, locale: Locale) -> Self {
        Self::new(cart.items(), locale.currency(), cart.is_open())
    }
}

impl CartItemView {
    fn new(item: &CartItem, currency: CurrencyCode) -> Self {
        let quantity = i64::from(item.quantity);
        Self {
            id: item.id.as_i32(),
            name: item.name.clone(),
            description: item.description.clone(),
            image_url: item.image_url.clone(),
            quantity: item.quantity,
            price: currency.format(item.price),
            line_price: currency.format(item.subtotal()),
            increment: quantity.saturating_add(1).min(MAX_QUANTITY),
            decrement: quantity.saturating_sub(1),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub payment_method: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
    pub payment_methods: [PaymentMethod; 2],
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub page: PageContext,
    pub cart: CartView,
}

/// Cart drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub page: PageContext,
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

// =============================================================================
// Helpers
// =============================================================================

/// Load the session cart for `locale`.
async fn open_cart(session: Session, locale: Locale) -> CartService<SessionCartStore> {
    let mut cart = CartService::with_key(SessionCartStore::new(session), cart_key(locale));
    cart.rehydrate().await;
    cart
}

fn cart_path(locale: Locale) -> String {
    format!("/{locale}/cart")
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// Respond to a cart change: the items fragment for HTMX, a redirect otherwise.
fn items_response(
    headers: &HeaderMap,
    cart: &CartService<SessionCartStore>,
    locale: Locale,
) -> Response {
    if !is_htmx(headers) {
        return Redirect::to(&cart_path(locale)).into_response();
    }

    (
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartItemsTemplate {
            page: PageContext::new(locale),
            cart: CartView::of(cart, locale),
        },
    )
        .into_response()
}

/// Respond to a panel change: the drawer fragment for HTMX, a redirect otherwise.
fn drawer_response(
    headers: &HeaderMap,
    cart: &CartService<SessionCartStore>,
    locale: Locale,
) -> Response {
    if !is_htmx(headers) {
        return Redirect::to(&cart_path(locale)).into_response();
    }

    CartDrawerTemplate {
        page: PageContext::new(locale),
        cart: CartView::of(cart, locale),
    }
    .into_response()
}

/// Read the checkout payment method from form input.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if no method was chosen or it is unknown.
pub fn parse_payment_method(input: Option<&str>) -> Result<PaymentMethod> {
    let raw = input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("select a payment method".to_string()))?;

    raw.parse().map_err(AppError::BadRequest)
}

/// Check a posted quantity. Zero and negatives are allowed and remove the line.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if `quantity` exceeds [`MAX_QUANTITY`].
pub fn check_quantity(quantity: i64) -> Result<i64> {
    if quantity > MAX_QUANTITY {
        return Err(AppError::BadRequest(format!(
            "quantity must be at most {MAX_QUANTITY}"
        )));
    }
    Ok(quantity)
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(Path(LocalePath { locale }): Path<LocalePath>, session: Session) -> impl IntoResponse {
    let cart = open_cart(session, locale).await;

    CartShowTemplate {
        page: PageContext::new(locale),
        cart: CartView::of(&cart, locale),
        payment_methods: PaymentMethod::ALL,
    }
}

/// Add one unit of a product to the cart.
///
/// The product is looked up in the catalog so the line captures the current
/// name and price for this locale. Returns the count badge with an HTMX
/// trigger, or redirects to the cart page for plain form posts.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    Path(LocalePath { locale }): Path<LocalePath>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state.products().require(form.product_id, locale).await?;

    let mut cart = open_cart(session, locale).await;
    cart.add_item(product.snapshot()).await;

    let product_id = form.product_id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));

    if !is_htmx(&headers) {
        return Ok(Redirect::to(&cart_path(locale)).into_response());
    }

    Ok((
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartCountTemplate {
            count: cart.total_items(),
        },
    )
        .into_response())
}

/// Set a line's quantity. Zero or less removes the line.
#[instrument(skip(session, headers))]
pub async fn update(
    Path(LocalePath { locale }): Path<LocalePath>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let quantity = check_quantity(form.quantity)?;

    let mut cart = open_cart(session, locale).await;
    cart.update_quantity(form.product_id, quantity).await;
    Ok(items_response(&headers, &cart, locale))
}

/// Remove a line from the cart.
#[instrument(skip(session, headers))]
pub async fn remove(
    Path(LocalePath { locale }): Path<LocalePath>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let mut cart = open_cart(session, locale).await;
    cart.remove_item(form.product_id).await;
    items_response(&headers, &cart, locale)
}

/// Remove every line from the cart.
#[instrument(skip(session, headers))]
pub async fn clear(
    Path(LocalePath { locale }): Path<LocalePath>,
    session: Session,
    headers: HeaderMap,
) -> Response {
    let mut cart = open_cart(session, locale).await;
    if cart.clear_cart().await {
        add_breadcrumb("cart", "Cleared cart", None);
    }
    items_response(&headers, &cart, locale)
}

/// Open or close the cart panel.
#[instrument(skip(session, headers))]
pub async fn toggle(
    Path(LocalePath { locale }): Path<LocalePath>,
    session: Session,
    headers: HeaderMap,
) -> Response {
    let mut cart = open_cart(session, locale).await;
    cart.toggle_cart().await;
    drawer_response(&headers, &cart, locale)
}

/// Close the cart panel. Closing a closed panel changes nothing.
#[instrument(skip(session, headers))]
pub async fn close(
    Path(LocalePath { locale }): Path<LocalePath>,
    session: Session,
    headers: HeaderMap,
) -> Response {
    let mut cart = open_cart(session, locale).await;
    cart.set_is_open(false).await;
    drawer_response(&headers, &cart, locale)
}

/// Get the cart drawer (HTMX).
#[instrument(skip(session))]
pub async fn drawer(Path(LocalePath { locale }): Path<LocalePath>, session: Session) -> impl IntoResponse {
    let cart = open_cart(session, locale).await;
    CartDrawerTemplate {
        page: PageContext::new(locale),
        cart: CartView::of(&cart, locale),
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(Path(LocalePath { locale }): Path<LocalePath>, session: Session) -> impl IntoResponse {
    let cart = open_cart(session, locale).await;
    CartCountTemplate {
        count: cart.total_items(),
    }
}

/// Redirect to the WhatsApp order link for the current cart.
///
/// An empty cart goes back to the cart page.
#[instrument(skip(state, session))]
pub async fn checkout(
    State(state): State<AppState>,
    Path(LocalePath { locale }): Path<LocalePath>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let payment_method = parse_payment_method(form.payment_method.as_deref())?;

    let cart = open_cart(session, locale).await;
    match cart.checkout_link(payment_method, locale.currency(), state.order_destination()) {
        Ok(link) => {
            add_breadcrumb(
                "checkout",
                "Sent order to WhatsApp",
                Some(&[("payment_method", payment_method.as_str())]),
            );
            Ok(Redirect::to(&link).into_response())
        }
        Err(CheckoutError::EmptyCart) => {
            tracing::debug!("checkout with empty cart, returning to cart page");
            Ok(Redirect::to(&cart_path(locale)).into_response())
        }
    }
}
