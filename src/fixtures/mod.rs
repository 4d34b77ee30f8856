//! Fixtures
//!
//! Loads a catalog, a set of offers and a cart from YAML files laid out as
//! `<base>/products/<set>.yml`, `<base>/offers/<set>.yml` and `<base>/carts/<set>.yml`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::de::DeserializeOwned;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError, InMemoryCatalog},
    fixtures::{carts::CartFixture, offers::OffersFixture, products::ProductsFixture},
    offers::{OfferError, OfferRegistry},
    products::{Product, ProductQuantity},
    quantity::QuantityError,
    teller::Teller,
};

pub mod carts;
pub mod offers;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Invalid offer data
    #[error("Invalid offer data: {0}")]
    InvalidOfferData(String),

    /// Invalid quantity
    #[error(transparent)]
    Quantity(#[from] QuantityError),

    /// Cart rejected a line
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Catalog rejected a product, e.g. on a currency mismatch
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Offer configuration rejected
    #[error(transparent)]
    Offer(#[from] OfferError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// String key -> product mappings for lookups
    products: FxHashMap<String, Product>,

    /// Catalog built from the loaded products
    catalog: Option<InMemoryCatalog<'static>>,

    /// Offers loaded so far
    offers: OfferRegistry<'static>,

    /// Cart loaded so far
    cart: Cart,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: FxHashMap::default(),
            catalog: None,
            offers: OfferRegistry::new(),
            cart: Cart::new(),
        }
    }

    /// Load products and prices from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = self.read("products", name)?;

        for (key, product_fixture) in fixture.products {
            let (product, price) = product_fixture.try_into_priced()?;

            let catalog = self
                .catalog
                .get_or_insert_with(|| InMemoryCatalog::new(price.currency()));

            catalog.add_product(product.clone(), price)?;

            self.products.insert(key, product);
        }

        debug!(set = name, products = self.products.len(), "loaded products");

        Ok(self)
    }

    /// Load offers and bundles from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if an offer references an unknown
    /// product, or if an offer is misconfigured or priced in another currency than the products.
    pub fn load_offers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: OffersFixture = self.read("offers", name)?;

        for offer in &fixture.offers {
            let product = self.product(offer.product())?.clone();
            let kind = offer.try_into_kind()?;

            kind.ensure_currency(&product, self.currency()?)?;

            self.offers.register_offer(product, kind)?;
        }

        for bundle in &fixture.bundles {
            let requirements = bundle
                .products
                .iter()
                .map(|member| {
                    Ok(ProductQuantity::new(
                        self.product(&member.product)?.clone(),
                        member.quantity()?,
                    ))
                })
                .collect::<Result<SmallVec<[ProductQuantity; 4]>, FixtureError>>()?;

            let percent = products::parse_percentage(&bundle.percent)?;

            self.offers.register_bundle(requirements, percent)?;
        }

        debug!(
            set = name,
            offers = fixture.offers.len(),
            bundles = fixture.bundles.len(),
            "loaded offers"
        );

        Ok(self)
    }

    /// Load cart lines from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a line references an unknown
    /// product or carries an invalid quantity.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CartFixture = self.read("carts", name)?;

        for line in &fixture.items {
            let product = self.product(&line.product)?.clone();

            self.cart.add_item_quantity(&product, line.quantity()?)?;
        }

        debug!(set = name, lines = self.cart.len(), "loaded cart");

        Ok(self)
    }

    /// Load a complete fixture set (products, offers and cart with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_products(name)?
            .load_offers(name)?
            .load_cart(name)?;

        Ok(fixture)
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product, FixtureError> {
        self.products
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get the catalog built from the loaded products
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded.
    pub fn catalog(&self) -> Result<&InMemoryCatalog<'static>, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoCurrency)
    }

    /// Get the currency of the loaded products
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.catalog().map(|catalog| catalog.currency())
    }

    /// Get the loaded offers
    pub fn offers(&self) -> &OfferRegistry<'static> {
        &self.offers
    }

    /// Get the loaded cart
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Build a teller over the loaded catalog, configured with the loaded offers
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded.
    pub fn teller(&self) -> Result<Teller<'_, 'static, InMemoryCatalog<'static>>, FixtureError> {
        Ok(Teller::with_offers(self.catalog()?, self.offers.clone()))
    }

    fn read<T: DeserializeOwned>(&self, category: &str, name: &str) -> Result<T, FixtureError> {
        let file_path = self.base_path.join(category).join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use crate::{cart::QuantityLookup, quantity::Quantity};

    use super::*;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    fn write_products(base: &Path) -> TestResult {
        write_fixture(
            base,
            "products",
            "basic",
            "products:\n  apples:\n    name: apples\n    unit: kilo\n    price: 1.99 GBP\n  rice:\n    name: rice\n    price: 2.49 GBP\n",
        )
    }

    #[test]
    fn load_products_builds_catalog() -> TestResult {
        let dir = tempfile::tempdir()?;
        write_products(dir.path())?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("basic")?;

        let catalog = fixture.catalog()?;

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.unit_price(fixture.product("apples")?),
            Some(Money::from_minor(199, GBP))
        );
        assert_eq!(fixture.currency()?, GBP);

        Ok(())
    }

    #[test]
    fn load_products_rejects_currency_mismatch() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_products(dir.path())?;
        write_fixture(
            dir.path(),
            "products",
            "dollars",
            "products:\n  soap:\n    name: soap\n    price: 1.00 USD\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("basic")?;

        let result = fixture.load_products("dollars").map(|_| ());

        assert!(matches!(
            result,
            Err(FixtureError::Catalog(CatalogError::CurrencyMismatch(product, found, expected)))
                if product == "soap" && found == "USD" && expected == "GBP"
        ));

        Ok(())
    }

    #[test]
    fn load_cart_accumulates_repeated_lines() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_products(dir.path())?;
        write_fixture(
            dir.path(),
            "carts",
            "basic",
            "items:\n  - product: rice\n  - product: apples\n    quantity: 2.5\n  - product: rice\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("basic")?.load_cart("basic")?;

        assert_eq!(fixture.cart().len(), 2);
        assert_eq!(
            fixture.cart().quantity_of(fixture.product("rice")?),
            Some(Quantity::units(2))
        );

        Ok(())
    }

    #[test]
    fn load_offers_rejects_unknown_product() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_products(dir.path())?;
        write_fixture(
            dir.path(),
            "offers",
            "basic",
            "offers:\n  - type: three_for_two\n    product: bananas\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("basic")?;

        let result = fixture.load_offers("basic").map(|_| ());

        assert!(matches!(result, Err(FixtureError::ProductNotFound(key)) if key == "bananas"));

        Ok(())
    }

    #[test]
    fn load_offers_rejects_empty_bundle() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_products(dir.path())?;
        write_fixture(
            dir.path(),
            "offers",
            "basic",
            "bundles:\n  - percent: 10%\n    products: []\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("basic")?;

        let result = fixture.load_offers("basic").map(|_| ());

        assert!(matches!(
            result,
            Err(FixtureError::Offer(OfferError::EmptyBundle))
        ));

        Ok(())
    }

    #[test]
    fn load_offers_rejects_group_price_in_another_currency() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_products(dir.path())?;
        write_fixture(
            dir.path(),
            "offers",
            "basic",
            "offers:\n  - type: two_for_amount\n    product: rice\n    amount: 4.00 USD\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("basic")?;

        let result = fixture.load_offers("basic").map(|_| ());

        assert!(matches!(
            result,
            Err(FixtureError::Offer(OfferError::CurrencyMismatch { found, expected, .. }))
                if found == "USD" && expected == "GBP"
        ));
        assert!(fixture.offers().is_empty());

        Ok(())
    }

    #[test]
    fn load_offers_rejects_percentage_above_one_hundred() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_products(dir.path())?;
        write_fixture(
            dir.path(),
            "offers",
            "basic",
            "offers:\n  - type: percentage_discount\n    product: rice\n    percent: 150%\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("basic")?;

        let result = fixture.load_offers("basic").map(|_| ());

        assert!(matches!(result, Err(FixtureError::InvalidPercentage(value)) if value == "150%"));

        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut fixture = Fixture::with_base_path("./does-not-exist");

        let result = fixture.load_products("basic").map(|_| ());

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }

    #[test]
    fn no_products_means_no_catalog() {
        let fixture = Fixture::new();

        assert!(matches!(fixture.catalog(), Err(FixtureError::NoCurrency)));
        assert!(matches!(fixture.currency(), Err(FixtureError::NoCurrency)));
    }
}
