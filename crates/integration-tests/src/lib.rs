//! Integration tests for Souq.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p souq-integration-tests
//! ```
//!
//! No database is needed. The storefront router runs in-process with an
//! in-memory session store and a lazily connected pool that the cart and
//! checkout routes never touch.
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart engine behind the write-through service
//! - `checkout` - Order summary, message and deep link
//! - `http_cart` - Cart, checkout and locale routes over HTTP

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::middleware::from_fn;
use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

use souq_core::{CartState, Locale, PhoneNumber, ProductId, ProductSnapshot};
use souq_storefront::config::{SentryConfig, StorefrontConfig};
use souq_storefront::middleware::{locale_redirect_middleware, session::SESSION_COOKIE_NAME};
use souq_storefront::models::session::cart_key;
use souq_storefront::routes;
use souq_storefront::state::AppState;

/// Destination every test checkout is sent to.
pub const ORDER_NUMBER: &str = "+967780065525";

/// A product snapshot with a decimal price given as text.
#[must_use]
pub fn snapshot(id: i32, name: &str, price: &str) -> ProductSnapshot {
    ProductSnapshot {
        id: ProductId::new(id),
        name: name.to_string(),
        price: price.parse::<Decimal>().unwrap(),
        image_url: format!("/static/products/{id}.jpeg"),
        description: format!("{name} description"),
    }
}

#[must_use]
pub fn order_number() -> PhoneNumber {
    PhoneNumber::parse(ORDER_NUMBER).unwrap()
}

/// Storefront configuration for in-process tests.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://localhost/souq_test"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("kT9#vQ2$mX7!pL4@wR8^zN3&bH6*jF1%"),
        order_whatsapp_number: order_number(),
        sentry: SentryConfig::default(),
    }
}

/// The storefront router over `sessions`, without static files or health
/// checks.
///
/// Must be called inside a Tokio runtime.
#[must_use]
pub fn test_app(sessions: MemoryStore) -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/souq_test")
        .unwrap();
    let state = AppState::new(test_config(), pool);

    routes::routes()
        .layer(from_fn(locale_redirect_middleware))
        .layer(SessionManagerLayer::new(sessions).with_name(SESSION_COOKIE_NAME))
        .with_state(state)
}

/// Create a session holding `items` as the cart for `locale`.
///
/// Returns the `Cookie` header value that selects it.
pub async fn session_with_cart(
    sessions: &MemoryStore,
    locale: Locale,
    items: Vec<ProductSnapshot>,
) -> String {
    let mut engine = souq_core::CartEngine::with_state(CartState::default());
    for item in items {
        engine.add_item(item);
    }

    let session = Session::new(None, Arc::new(sessions.clone()), None);
    session
        .insert(&cart_key(locale), engine.state())
        .await
        .unwrap();
    session.save().await.unwrap();

    format!("{SESSION_COOKIE_NAME}={}", session.id().unwrap())
}

/// A response reduced to what tests assert on.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get("location")
            .and_then(|v| v.to_str().ok())
    }
}

/// Send one request through `app`.
pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();

    TestResponse {
        status,
        headers,
        body: String::from_utf8(body.to_vec()).unwrap(),
    }
}

/// Build a GET request, optionally with a session cookie.
#[must_use]
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Build a form POST, optionally with a session cookie and the HTMX header.
#[must_use]
pub fn post_form(uri: &str, form: &str, cookie: Option<&str>, htmx: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    if htmx {
        builder = builder.header("hx-request", "true");
    }
    builder.body(Body::from(form.to_string())).unwrap()
}
