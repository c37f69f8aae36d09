//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//! 5. Locale redirect (needs the session for the preferred locale)

pub mod locale;
pub mod request_id;
pub mod session;

pub use locale::locale_redirect_middleware;
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
