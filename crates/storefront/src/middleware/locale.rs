//! Locale prefix enforcement.
//!
//! Every page lives under `/{locale}`. Requests for a path without a supported
//! locale prefix are redirected to the same path under the visitor's last
//! locale (kept in the session), falling back to English:
//!
//! ```text
//! /            -> /en
//! /cart        -> /en/cart
//! /fr/cart     -> /en/fr/cart
//! /ar/cart     (served as-is)
//! ```
//!
//! Static assets, health checks, API paths and anything that looks like a
//! file name (`/favicon.ico`) are left alone.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use souq_core::Locale;

use crate::models::session::keys;

/// Path prefixes served without a locale.
const EXEMPT_PREFIXES: [&str; 3] = ["/static", "/health", "/api"];

fn is_exempt(path: &str) -> bool {
    let under_exempt = EXEMPT_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    });

    let looks_like_file = path
        .rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('.'));

    under_exempt || looks_like_file
}

/// Where a request for `path` should be sent, if anywhere.
///
/// Returns `None` when the path already carries a supported locale or is
/// exempt. The query string, if any, is preserved.
#[must_use]
pub fn redirect_target(path: &str, query: Option<&str>, preferred: Locale) -> Option<String> {
    if is_exempt(path) || Locale::from_path(path).is_some() {
        return None;
    }

    let mut target = if path == "/" || path.is_empty() {
        format!("/{preferred}")
    } else {
        format!("/{preferred}{path}")
    };

    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }

    Some(target)
}

/// Redirect unprefixed paths to their localized equivalent.
///
/// Must run inside the session layer.
pub async fn locale_redirect_middleware(session: Session, request: Request, next: Next) -> Response {
    let uri = request.uri().clone();

    if let Some(current) = Locale::from_path(uri.path()) {
        // Remember the choice for the next unprefixed visit
        let stored = session.get::<Locale>(keys::LOCALE).await.ok().flatten();
        if stored != Some(current) {
            if let Err(e) = session.insert(keys::LOCALE, current).await {
                tracing::warn!(error = %e, "failed to store locale in session");
            }
        }
        return next.run(request).await;
    }

    let preferred = session
        .get::<Locale>(keys::LOCALE)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();

    match redirect_target(uri.path(), uri.query(), preferred) {
        Some(target) => {
            tracing::debug!(from = %uri, to = %target, "redirecting to localized path");
            Redirect::temporary(&target).into_response()
        }
        None => next.run(request).await,
    }
}
