//! Offer Fixtures

use std::num::NonZeroU32;

use rusty_money::Money;
use serde::Deserialize;

use crate::{
    fixtures::{
        FixtureError,
        products::{parse_percentage, parse_price},
    },
    offers::OfferKind,
    quantity::Quantity,
};

/// Wrapper for offers in YAML
#[derive(Debug, Default, Deserialize)]
pub struct OffersFixture {
    /// Single-product offers, applied in order
    #[serde(default)]
    pub offers: Vec<OfferFixture>,

    /// Bundle offers
    #[serde(default)]
    pub bundles: Vec<BundleFixture>,
}

/// Single-product offer from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OfferFixture {
    /// Percentage off every unit
    PercentageDiscount {
        /// Product key
        product: String,

        /// Percentage (e.g., "20%" or "0.2")
        percent: String,
    },

    /// Every third unit free
    ThreeForTwo {
        /// Product key
        product: String,
    },

    /// Two units for a fixed price
    TwoForAmount {
        /// Product key
        product: String,

        /// Price for two (e.g., "0.99 GBP")
        amount: String,
    },

    /// Five units for a fixed price
    FiveForAmount {
        /// Product key
        product: String,

        /// Price for five (e.g., "7.49 GBP")
        amount: String,
    },

    /// Any number of units for a fixed price
    NForAmount {
        /// Product key
        product: String,

        /// Units per group
        count: u32,

        /// Price for a group
        amount: String,
    },
}

impl OfferFixture {
    /// The product key the offer targets.
    pub fn product(&self) -> &str {
        match self {
            OfferFixture::PercentageDiscount { product, .. }
            | OfferFixture::ThreeForTwo { product }
            | OfferFixture::TwoForAmount { product, .. }
            | OfferFixture::FiveForAmount { product, .. }
            | OfferFixture::NForAmount { product, .. } => product,
        }
    }

    /// Convert into an offer kind.
    ///
    /// # Errors
    ///
    /// Returns an error if a price or percentage cannot be parsed, or a group size is zero.
    pub fn try_into_kind(&self) -> Result<OfferKind<'static>, FixtureError> {
        match self {
            OfferFixture::PercentageDiscount { percent, .. } => {
                Ok(OfferKind::PercentageDiscount(parse_percentage(percent)?))
            }
            OfferFixture::ThreeForTwo { .. } => Ok(OfferKind::ThreeForTwo),
            OfferFixture::TwoForAmount { amount, .. } => {
                Ok(OfferKind::two_for_amount(parse_money(amount)?))
            }
            OfferFixture::FiveForAmount { amount, .. } => {
                Ok(OfferKind::five_for_amount(parse_money(amount)?))
            }
            OfferFixture::NForAmount { count, amount, .. } => {
                let count = NonZeroU32::new(*count).ok_or_else(|| {
                    FixtureError::InvalidOfferData(format!(
                        "{} offer has a group size of zero",
                        self.product()
                    ))
                })?;

                Ok(OfferKind::NForAmount {
                    count,
                    amount: parse_money(amount)?,
                })
            }
        }
    }
}

/// Bundle offer from YAML
#[derive(Debug, Deserialize)]
pub struct BundleFixture {
    /// Percentage off the bundled price
    pub percent: String,

    /// Member products
    pub products: Vec<BundleMemberFixture>,
}

/// Bundle member from YAML
#[derive(Debug, Deserialize)]
pub struct BundleMemberFixture {
    /// Product key
    pub product: String,

    /// Minimum quantity
    #[serde(default = "default_quantity")]
    pub quantity: f64,
}

fn default_quantity() -> f64 {
    1.0
}

impl BundleMemberFixture {
    /// The minimum quantity as a validated quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity is negative or not finite.
    pub fn quantity(&self) -> Result<Quantity, FixtureError> {
        Ok(Quantity::try_from(self.quantity)?)
    }
}

fn parse_money(s: &str) -> Result<Money<'static, rusty_money::iso::Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(s)?;

    Ok(Money::from_minor(minor_units, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn offers_fixture_parses_every_offer_type() -> TestResult {
        let yaml = "\
offers:
  - type: percentage_discount
    product: apples
    percent: 20%
  - type: three_for_two
    product: cherry_tomatoes
  - type: two_for_amount
    product: toothbrush
    amount: 0.99 GBP
  - type: five_for_amount
    product: toothpaste
    amount: 7.49 GBP
  - type: n_for_amount
    product: rice
    count: 4
    amount: 8.00 GBP
bundles:
  - percent: 10%
    products:
      - product: toothbrush
      - product: toothpaste
        quantity: 2
";

        let fixture: OffersFixture = serde_norway::from_str(yaml)?;

        let products: Vec<&str> = fixture.offers.iter().map(OfferFixture::product).collect();

        assert_eq!(
            products,
            vec!["apples", "cherry_tomatoes", "toothbrush", "toothpaste", "rice"]
        );

        let kinds = fixture
            .offers
            .iter()
            .map(OfferFixture::try_into_kind)
            .collect::<Result<Vec<_>, _>>()?;

        assert!(matches!(kinds.first(), Some(OfferKind::PercentageDiscount(_))));
        assert!(matches!(kinds.get(1), Some(OfferKind::ThreeForTwo)));
        assert!(matches!(
            kinds.get(3),
            Some(OfferKind::NForAmount { count, amount })
                if count.get() == 5 && *amount == Money::from_minor(749, GBP)
        ));
        assert!(matches!(
            kinds.get(4),
            Some(OfferKind::NForAmount { count, .. }) if count.get() == 4
        ));

        let bundle = fixture.bundles.first().ok_or("missing bundle")?;
        let quantities = bundle
            .products
            .iter()
            .map(BundleMemberFixture::quantity)
            .collect::<Result<Vec<_>, _>>()?;

        assert_eq!(quantities, vec![Quantity::ONE, Quantity::units(2)]);

        Ok(())
    }

    #[test]
    fn zero_group_size_is_rejected() -> TestResult {
        let fixture: OfferFixture =
            serde_norway::from_str("type: n_for_amount\nproduct: rice\ncount: 0\namount: 1.00 GBP\n")?;

        assert!(matches!(
            fixture.try_into_kind(),
            Err(FixtureError::InvalidOfferData(_))
        ));

        Ok(())
    }

    #[test]
    fn negative_bundle_quantity_is_rejected() -> TestResult {
        let member: BundleMemberFixture = serde_norway::from_str("product: rice\nquantity: -1\n")?;

        assert!(matches!(member.quantity(), Err(FixtureError::Quantity(_))));

        Ok(())
    }
}
