//! Catalog product domain types.
//!
//! A [`CatalogProduct`] is one product as seen in one locale: the translated
//! name and description for that language, and the prices for every currency.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use souq_core::{CurrencyCode, Locale, Price, ProductId, ProductSnapshot};

/// List and sale prices for each currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProductPrices {
    pub usd: Decimal,
    pub sar: Decimal,
    /// Sale price in USD, if on sale.
    pub discount_usd: Option<Decimal>,
    /// Sale price in SAR, if on sale.
    pub discount_sar: Option<Decimal>,
}

impl ProductPrices {
    /// Regular price in `currency`.
    #[must_use]
    pub const fn list(&self, currency: CurrencyCode) -> Decimal {
        match currency {
            CurrencyCode::USD => self.usd,
            CurrencyCode::SAR => self.sar,
        }
    }

    /// Sale price in `currency`.
    ///
    /// Only a positive discount below the list price counts as a sale.
    #[must_use]
    pub fn sale(&self, currency: CurrencyCode) -> Option<Decimal> {
        let discount = match currency {
            CurrencyCode::USD => self.discount_usd,
            CurrencyCode::SAR => self.discount_sar,
        }?;
        (discount > Decimal::ZERO && discount < self.list(currency)).then_some(discount)
    }

    /// The price a shopper pays in `currency`.
    #[must_use]
    pub fn effective(&self, currency: CurrencyCode) -> Decimal {
        self.sale(currency).unwrap_or_else(|| self.list(currency))
    }
}

/// A product with its details in one language.
#[derive(Debug, Clone)]
pub struct CatalogProduct {
    pub id: ProductId,
    /// Locale the name and description are written in.
    pub locale: Locale,
    pub name: String,
    pub description: String,
    pub features: Vec<String>,
    pub image_url: String,
    pub prices: ProductPrices,
    pub created_at: DateTime<Utc>,
}

impl CatalogProduct {
    /// Regular price in the product's locale currency.
    #[must_use]
    pub fn list_price(&self) -> Price {
        let currency = self.locale.currency();
        Price::new(self.prices.list(currency), currency)
    }

    /// Sale price in the product's locale currency, if on sale.
    #[must_use]
    pub fn sale_price(&self) -> Option<Price> {
        let currency = self.locale.currency();
        self.prices
            .sale(currency)
            .map(|amount| Price::new(amount, currency))
    }

    /// Price charged when the product is added to the cart.
    #[must_use]
    pub fn price(&self) -> Price {
        let currency = self.locale.currency();
        Price::new(self.prices.effective(currency), currency)
    }

    /// Capture the fields a cart line keeps.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            name: self.name.clone(),
            price: self.price().amount,
            image_url: self.image_url.clone(),
            description: self.description.clone(),
        }
    }
}
