//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use souq_core::{Locale, ProductId};

use crate::error::{AppError, Result};
use crate::i18n::PageContext;
use crate::models::CatalogProduct;
use crate::routes::LocalePath;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub features: Vec<String>,
    pub image_url: String,
    /// Price the shopper pays.
    pub price: String,
    /// Struck-through list price, when on sale.
    pub compare_at_price: Option<String>,
}

impl From<&CatalogProduct> for ProductView {
    fn from(product: &CatalogProduct) -> Self {
        let sale = product.sale_price();
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.description.clone(),
            features: product.features.clone(),
            image_url: product.image_url.clone(),
            price: product.price().display(),
            compare_at_price: sale.map(|_| product.list_price().display()),
        }
    }
}

/// Path parameters for a product page.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProductPath {
    pub locale: Locale,
    pub id: ProductId,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub products: Vec<ProductView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductView,
}

/// Display product listing page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Path(LocalePath { locale }): Path<LocalePath>,
) -> Result<impl IntoResponse> {
    let products = state.products().list(locale).await?;
    tracing::debug!(count = products.len(), "listed products");

    Ok(ProductsIndexTemplate {
        page: PageContext::new(locale),
        products: products.iter().map(ProductView::from).collect(),
    })
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(ProductPath { locale, id }): Path<ProductPath>,
) -> Result<impl IntoResponse> {
    let product = state
        .products()
        .get(id, locale)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductShowTemplate {
        page: PageContext::new(locale),
        product: ProductView::from(&product),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::ProductPrices;

    #[test]
    fn test_product_view_shows_sale_against_list_price() {
        let product = CatalogProduct {
            id: ProductId::new(3),
            locale: Locale::Ar,
            name: "نتفليكس".to_string(),
            description: String::new(),
            features: vec!["4K".to_string()],
            image_url: "/static/img/netflix.jpg".to_string(),
            prices: ProductPrices {
                usd: Decimal::from(15),
                sar: Decimal::from(56),
                discount_usd: None,
                discount_sar: Some(Decimal::from(45)),
            },
            created_at: DateTime::<Utc>::default(),
        };

        let view = ProductView::from(&product);
        assert_eq!(view.id, 3);
        assert_eq!(view.price, "SAR 45.00");
        assert_eq!(view.compare_at_price.as_deref(), Some("SAR 56.00"));
    }
}
