//! Product catalog repository.
//!
//! Read-only: the storefront never writes catalog rows. Products are joined to
//! their detail row for the requested language, so a product without a
//! translation is not listed in that locale.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use souq_core::{Locale, ProductId};

use super::RepositoryError;
use crate::models::{CatalogProduct, ProductPrices};

const SELECT_PRODUCTS: &str = r"
    SELECT p.id, p.price_usd, p.price_sar, p.discount_usd, p.discount_sar,
           p.image_url, p.created_at,
           d.name, d.description, d.features
    FROM storefront.product p
    JOIN storefront.product_detail d ON d.product_id = p.id
    JOIN storefront.language l ON l.id = d.language_id
    WHERE l.code = $1
";

/// Row shape shared by the catalog queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    price_usd: Decimal,
    price_sar: Decimal,
    discount_usd: Option<Decimal>,
    discount_sar: Option<Decimal>,
    image_url: String,
    created_at: DateTime<Utc>,
    name: String,
    description: String,
    features: Json<Vec<String>>,
}

impl ProductRow {
    fn into_product(self, locale: Locale) -> Result<CatalogProduct, RepositoryError> {
        if self.price_usd.is_sign_negative() || self.price_sar.is_sign_negative() {
            return Err(RepositoryError::DataCorruption(format!(
                "negative price for product {}",
                self.id
            )));
        }

        Ok(CatalogProduct {
            id: ProductId::new(self.id),
            locale,
            name: self.name,
            description: self.description,
            features: self.features.0,
            image_url: self.image_url,
            prices: ProductPrices {
                usd: self.price_usd,
                sar: self.price_sar,
                discount_usd: self.discount_usd,
                discount_sar: self.discount_sar,
            },
            created_at: self.created_at,
        })
    }
}

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product translated into `locale`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row has a negative price.
    pub async fn list(&self, locale: Locale) -> Result<Vec<CatalogProduct>, RepositoryError> {
        let query = format!("{SELECT_PRODUCTS} ORDER BY p.id");
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(locale.code())
            .fetch_all(self.pool)
            .await?;

        rows.into_iter()
            .map(|row| row.into_product(locale))
            .collect()
    }

    /// Get one product in `locale`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row has a negative price.
    pub async fn get(
        &self,
        id: ProductId,
        locale: Locale,
    ) -> Result<Option<CatalogProduct>, RepositoryError> {
        let query = format!("{SELECT_PRODUCTS} AND p.id = $2");
        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(locale.code())
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(|row| row.into_product(locale)).transpose()
    }

    /// Get one product in `locale`, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if there is no such product in `locale`.
    pub async fn require(
        &self,
        id: ProductId,
        locale: Locale,
    ) -> Result<CatalogProduct, RepositoryError> {
        self.get(id, locale).await?.ok_or(RepositoryError::NotFound)
    }
}
