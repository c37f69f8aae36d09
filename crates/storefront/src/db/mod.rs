//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `souq_storefront`
//!
//! ## Tables
//!
//! - `storefront.language` - Supported catalog languages (`en`, `ar`)
//! - `storefront.product` - Products with per-currency prices
//! - `storefront.product_detail` - Per-language name, description, features
//! - `tower_sessions.session` - Tower-sessions storage (holds the cart)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p souq-cli -- migrate
//! ```

pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use products::ProductRepository;

/// How long the readiness probe waits for the database.
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Check that the database answers a trivial query within [`PING_TIMEOUT`].
pub async fn ping(pool: &PgPool) -> bool {
    match tokio::time::timeout(PING_TIMEOUT, sqlx::query("SELECT 1").execute(pool)).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "database ping failed");
            false
        }
        Err(_) => {
            tracing::warn!(timeout_secs = PING_TIMEOUT.as_secs(), "database ping timed out");
            false
        }
    }
}
