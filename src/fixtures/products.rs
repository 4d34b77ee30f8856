//! Product Fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    offers::validate_percent,
    products::{Product, ProductUnit},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// How the product is sold
    #[serde(default = "default_unit")]
    pub unit: ProductUnit,

    /// Unit price (e.g., "1.99 GBP")
    pub price: String,
}

fn default_unit() -> ProductUnit {
    ProductUnit::Each
}

impl ProductFixture {
    /// Convert into a product and its unit price.
    ///
    /// # Errors
    ///
    /// Returns an error if the price cannot be parsed.
    pub fn try_into_priced(self) -> Result<(Product, Money<'static, Currency>), FixtureError> {
        let (minor_units, currency) = parse_price(&self.price)?;

        Ok((
            Product::new(self.name, self.unit),
            Money::from_minor(minor_units, currency),
        ))
    }
}

/// Parse a price such as `"2.49 GBP"` into minor units and its currency.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] unless the string is a decimal amount followed by a
/// currency code, or [`FixtureError::UnknownCurrency`] for codes other than GBP, USD and EUR.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let invalid = || FixtureError::InvalidPrice(s.to_string());

    let mut tokens = s.split_whitespace();

    let (Some(amount), Some(code), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(invalid());
    };

    let currency = currency_for(code)?;

    let minor_units = amount
        .parse::<Decimal>()
        .map_err(|_err| invalid())?
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|minor| minor.to_i64())
        .ok_or_else(invalid)?;

    Ok((minor_units, currency))
}

fn currency_for(code: &str) -> Result<&'static Currency, FixtureError> {
    [GBP, USD, EUR]
        .into_iter()
        .find(|currency| currency.iso_alpha_code == code)
        .ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))
}

/// Parse a percentage written either in points (`"15%"`) or as a fraction (`"0.15"`).
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPercentage`] if the value is not a number, or lies outside
/// 0% to 100%.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let invalid = || FixtureError::InvalidPercentage(s.to_string());

    let trimmed = s.trim();

    let (number, scale) = match trimmed.strip_suffix('%') {
        Some(points) => (points.trim_end(), Decimal::ONE_HUNDRED),
        None => (trimmed, Decimal::ONE),
    };

    let fraction = number.parse::<Decimal>().map_err(|_err| invalid())? / scale;

    validate_percent(Percentage::from(fraction)).map_err(|_err| invalid())
}
