//! Catalog
//!
//! The till only needs to ask a catalog for a product's unit price. Any price source can be plugged
//! in by implementing [`Catalog`]; [`InMemoryCatalog`] is a simple map-backed snapshot.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::products::Product;

/// Errors raised while building a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// A product was priced in a different currency to the catalog (product, price currency, catalog currency).
    #[error("{0} is priced in {1}, but the catalog uses {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// Read-only unit price lookup.
pub trait Catalog<'a> {
    /// Currency all prices are quoted in.
    fn currency(&self) -> &'a Currency;

    /// Unit price for a product, or `None` if the catalog does not stock it.
    fn unit_price(&self, product: &Product) -> Option<Money<'a, Currency>>;
}

/// A catalog backed by an in-memory price map.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog<'a> {
    currency: &'a Currency,
    prices: FxHashMap<Product, Money<'a, Currency>>,
}

impl<'a> InMemoryCatalog<'a> {
    /// Create an empty catalog quoting prices in `currency`.
    pub fn new(currency: &'a Currency) -> Self {
        Self {
            currency,
            prices: FxHashMap::default(),
        }
    }

    /// Add or reprice a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CurrencyMismatch`] if the price is in another currency.
    pub fn add_product(
        &mut self,
        product: Product,
        price: Money<'a, Currency>,
    ) -> Result<&mut Self, CatalogError> {
        if price.currency() != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                product.name().to_string(),
                price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        self.prices.insert(product, price);

        Ok(self)
    }

    /// Number of priced products.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether no products are priced.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl<'a> Catalog<'a> for InMemoryCatalog<'a> {
    fn currency(&self) -> &'a Currency {
        self.currency
    }

    fn unit_price(&self, product: &Product) -> Option<Money<'a, Currency>> {
        self.prices.get(product).copied()
    }
}
