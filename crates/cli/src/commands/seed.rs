//! Seed the product catalog from a YAML file.
//!
//! The file lists the catalog languages and every product with its prices and
//! one detail entry (name, description, features) per language:
//!
//! ```yaml
//! languages:
//!   - code: en
//!     name: English
//! products:
//!   - price_usd: "20.00"
//!     price_sar: "75.00"
//!     discount_usd: "15.00"
//!     image_url: /static/products/chatgpt.jpeg
//!     details:
//!       en:
//!         name: ChatGPT
//!         description: AI assistant
//!         features: [Text generation]
//! ```
//!
//! Everything is written in one transaction. Seeding refuses to run against
//! a catalog that already has products unless `--clear` is given.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{error, info};

use souq_core::{LanguageId, Locale, ProductId};
use souq_storefront::db;

use super::database_url;

/// Top-level shape of a catalog seed file.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub languages: Vec<LanguageEntry>,
    #[serde(default)]
    pub products: Vec<ProductEntry>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageEntry {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductEntry {
    pub price_usd: Decimal,
    pub price_sar: Decimal,
    #[serde(default)]
    pub discount_usd: Option<Decimal>,
    #[serde(default)]
    pub discount_sar: Option<Decimal>,
    #[serde(default)]
    pub image_url: String,
    /// Detail per language code.
    pub details: BTreeMap<String, DetailEntry>,
}

#[derive(Debug, Deserialize)]
pub struct DetailEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Counts of rows written by a seed run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub languages: usize,
    pub products: usize,
    pub details: usize,
}

/// Errors from writing the catalog.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("catalog already has {0} products; pass --clear to replace them")]
    CatalogNotEmpty(i64),

    #[error("detail references undeclared language: {0}")]
    UnknownLanguage(String),
}

/// Check a catalog file before touching the database.
///
/// Returns one message per problem; an empty list means the file is valid.
#[must_use]
pub fn validate_catalog(catalog: &CatalogFile) -> Vec<String> {
    let mut errors = Vec::new();
    let mut declared = HashSet::new();

    for language in &catalog.languages {
        if language.code.parse::<Locale>().is_err() {
            errors.push(format!("language {}: unsupported code", language.code));
        }
        if !declared.insert(language.code.as_str()) {
            errors.push(format!("language {}: declared twice", language.code));
        }
    }

    for (index, product) in catalog.products.iter().enumerate() {
        let label = product
            .details
            .values()
            .next()
            .map_or_else(|| format!("product #{}", index + 1), |d| d.name.clone());

        let prices = [
            ("price_usd", Some(product.price_usd)),
            ("price_sar", Some(product.price_sar)),
            ("discount_usd", product.discount_usd),
            ("discount_sar", product.discount_sar),
        ];
        for (field, value) in prices {
            if value.is_some_and(|v| v.is_sign_negative()) {
                errors.push(format!("{label}: {field} is negative"));
            }
        }

        if product.details.is_empty() {
            errors.push(format!("{label}: no details"));
        }
        for (code, detail) in &product.details {
            if !declared.contains(code.as_str()) {
                errors.push(format!("{label}: detail for undeclared language {code}"));
            }
            if detail.name.trim().is_empty() {
                errors.push(format!("{label}: empty name for {code}"));
            }
        }
    }

    errors
}

/// Write `catalog` to the database in a single transaction.
///
/// # Errors
///
/// Returns `SeedError::CatalogNotEmpty` if products exist and `clear` is
/// false, and `SeedError::Database` if any statement fails. Nothing is
/// written on error.
pub async fn seed_catalog(
    pool: &PgPool,
    catalog: &CatalogFile,
    clear: bool,
) -> Result<SeedReport, SeedError> {
    let mut tx = pool.begin().await?;

    if clear {
        sqlx::query("TRUNCATE storefront.product RESTART IDENTITY CASCADE")
            .execute(&mut *tx)
            .await?;
        info!("Cleared existing products");
    } else {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM storefront.product")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Err(SeedError::CatalogNotEmpty(existing));
        }
    }

    let mut report = SeedReport::default();
    let mut language_ids: HashMap<&str, LanguageId> = HashMap::new();

    for language in &catalog.languages {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO storefront.language (code, name)
            VALUES ($1, $2)
            ON CONFLICT (code) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            ",
        )
        .bind(&language.code)
        .bind(&language.name)
        .fetch_one(&mut *tx)
        .await?;

        language_ids.insert(language.code.as_str(), LanguageId::new(id));
        report.languages += 1;
    }

    for product in &catalog.products {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO storefront.product
                (price_usd, price_sar, discount_usd, discount_sar, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(product.price_usd)
        .bind(product.price_sar)
        .bind(product.discount_usd)
        .bind(product.discount_sar)
        .bind(&product.image_url)
        .fetch_one(&mut *tx)
        .await?;
        let product_id = ProductId::new(id);
        report.products += 1;

        for (code, detail) in &product.details {
            let language_id = language_ids
                .get(code.as_str())
                .copied()
                .ok_or_else(|| SeedError::UnknownLanguage(code.clone()))?;

            sqlx::query(
                r"
                INSERT INTO storefront.product_detail
                    (product_id, language_id, name, description, features)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(product_id)
            .bind(language_id)
            .bind(&detail.name)
            .bind(&detail.description)
            .bind(Json(&detail.features))
            .execute(&mut *tx)
            .await?;
            report.details += 1;
        }
    }

    tx.commit().await?;
    Ok(report)
}

/// Seed the catalog from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML catalog file
/// * `clear` - If true, delete existing products first
///
/// # Errors
///
/// Returns an error if environment variables are missing, the file cannot be
/// read or fails validation, or database operations fail.
pub async fn catalog(file_path: &str, clear: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let catalog: CatalogFile = serde_yaml::from_str(&content)?;

    info!(
        languages = catalog.languages.len(),
        products = catalog.products.len(),
        "Parsed catalog"
    );

    let errors = validate_catalog(&catalog);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    info!(clear, "Starting seeding process");
    let report = seed_catalog(&pool, &catalog, clear).await?;

    info!("Seeding complete!");
    info!("  Languages: {}", report.languages);
    info!("  Products inserted: {}", report.products);
    info!("  Details inserted: {}", report.details);

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
languages:
  - code: en
    name: English
  - code: ar
    name: Arabic
products:
  - price_usd: "20.00"
    price_sar: "75.00"
    discount_usd: "15.00"
    image_url: /static/products/chatgpt.jpeg
    details:
      en:
        name: ChatGPT
        description: AI assistant
        features: ["Text generation", "Code generation"]
      ar:
        name: ChatGPT
        features: ["توليد النصوص"]
"#;

    #[test]
    fn test_sample_parses_and_validates() {
        let catalog: CatalogFile = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(catalog.languages.len(), 2);
        assert_eq!(catalog.products[0].price_usd, Decimal::new(2000, 2));
        assert_eq!(catalog.products[0].discount_sar, None);
        assert_eq!(catalog.products[0].details["ar"].description, "");
        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn test_bundled_catalog_is_valid() {
        let content = include_str!("../../seed/catalog.yaml");
        let catalog: CatalogFile = serde_yaml::from_str(content).unwrap();
        assert!(!catalog.products.is_empty());
        assert_eq!(validate_catalog(&catalog), Vec::<String>::new());
    }

    #[test]
    fn test_validation_reports_each_problem() {
        let yaml = r#"
languages:
  - code: en
    name: English
  - code: fr
    name: French
  - code: en
    name: English again
products:
  - price_usd: "-1"
    price_sar: "4"
    details:
      ar:
        name: "  "
"#;
        let catalog: CatalogFile = serde_yaml::from_str(yaml).unwrap();
        let errors = validate_catalog(&catalog);

        assert!(errors.iter().any(|e| e.contains("fr: unsupported code")));
        assert!(errors.iter().any(|e| e.contains("declared twice")));
        assert!(errors.iter().any(|e| e.contains("price_usd is negative")));
        assert!(errors.iter().any(|e| e.contains("undeclared language ar")));
        assert!(errors.iter().any(|e| e.contains("empty name for ar")));
    }

    #[test]
    fn test_product_without_details_is_rejected() {
        let yaml = r#"
languages: [{ code: en, name: English }]
products:
  - price_usd: "1"
    price_sar: "4"
    details: {}
"#;
        let catalog: CatalogFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(validate_catalog(&catalog), vec!["product #1: no details".to_string()]);
    }
}
