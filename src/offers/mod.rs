//! Offers
//!
//! Special offers configured at the till. Each product carries at most one single-product offer;
//! bundles span several products and are kept separately.

use std::num::NonZeroU32;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::{
    products::{Product, ProductQuantity},
    quantity::QuantityError,
};

pub mod bundle;

pub use bundle::Bundle;

new_key_type! {
    /// Single-product offer key
    pub struct OfferKey;

    /// Bundle offer key
    pub struct BundleKey;
}

/// Errors raised while configuring offers.
#[derive(Debug, Error, PartialEq)]
pub enum OfferError {
    /// A bundle must list at least one product.
    #[error("bundle has no products")]
    EmptyBundle,

    /// Every bundle requirement must ask for a positive quantity.
    #[error("bundle requires a zero quantity of {0}")]
    ZeroBundleQuantity(String),

    /// A product may only appear once in a bundle.
    #[error("{0} appears more than once in the bundle")]
    DuplicateBundleProduct(String),

    /// Percentages must lie between 0% and 100%.
    #[error("percentage {0} is outside 0 to 1")]
    InvalidPercentage(Decimal),

    /// An offer priced in a currency other than the catalog's.
    #[error("offer on {product} is priced in {found}, expected {expected}")]
    CurrencyMismatch {
        /// Product the offer targets
        product: String,

        /// Currency of the offer amount
        found: &'static str,

        /// Catalog currency
        expected: &'static str,
    },

    /// A bundle requirement carries an invalid quantity.
    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

/// Group size for the three-for-two offer.
pub const THREE_FOR_TWO_GROUP: u32 = 3;

/// Group size for the two-for-amount offer.
pub const TWO_FOR_AMOUNT_GROUP: NonZeroU32 = match NonZeroU32::new(2) {
    Some(count) => count,
    None => unreachable!(),
};

/// Group size for the five-for-amount offer.
pub const FIVE_FOR_AMOUNT_GROUP: NonZeroU32 = match NonZeroU32::new(5) {
    Some(count) => count,
    None => unreachable!(),
};

/// Check a percentage lies between 0% and 100%.
///
/// # Errors
///
/// Returns [`OfferError::InvalidPercentage`] for negative values or values above 100%.
pub fn validate_percent(percent: Percentage) -> Result<Percentage, OfferError> {
    // Percentage::from(f64) can carry float noise past the tenth decimal place
    let fraction = (percent * Decimal::ONE).round_dp(10);

    if fraction < Decimal::ZERO || fraction > Decimal::ONE {
        return Err(OfferError::InvalidPercentage(fraction));
    }

    Ok(percent)
}

/// The discount rule carried by a single-product offer.
#[derive(Debug, Copy, Clone)]
pub enum OfferKind<'a> {
    /// A percentage off every unit (e.g., "20% off")
    PercentageDiscount(Percentage),

    /// Every third unit is free
    ThreeForTwo,

    /// A fixed price for each group of `count` units (e.g., "5 for £7.49")
    NForAmount {
        /// Units per group
        count: NonZeroU32,

        /// Price paid for a whole group
        amount: Money<'a, Currency>,
    },
}

impl<'a> OfferKind<'a> {
    /// Two units for a fixed amount.
    pub fn two_for_amount(amount: Money<'a, Currency>) -> Self {
        OfferKind::NForAmount {
            count: TWO_FOR_AMOUNT_GROUP,
            amount,
        }
    }

    /// Five units for a fixed amount.
    pub fn five_for_amount(amount: Money<'a, Currency>) -> Self {
        OfferKind::NForAmount {
            count: FIVE_FOR_AMOUNT_GROUP,
            amount,
        }
    }

    /// Currency of the fixed group price, if the offer has one.
    pub fn currency(&self) -> Option<&Currency> {
        match self {
            OfferKind::NForAmount { amount, .. } => Some(amount.currency()),
            OfferKind::PercentageDiscount(_) | OfferKind::ThreeForTwo => None,
        }
    }

    /// Check the offer is priced in `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`OfferError::CurrencyMismatch`] if a group price is in another currency.
    pub fn ensure_currency(
        &self,
        product: &Product,
        expected: &Currency,
    ) -> Result<(), OfferError> {
        match self.currency() {
            Some(found) if found != expected => Err(OfferError::CurrencyMismatch {
                product: product.name().to_string(),
                found: found.iso_alpha_code,
                expected: expected.iso_alpha_code,
            }),
            _ => Ok(()),
        }
    }
}

/// A single-product offer
#[derive(Debug, Clone)]
pub struct SpecialOffer<'a> {
    product: Product,
    kind: OfferKind<'a>,
}

impl<'a> SpecialOffer<'a> {
    /// Create a new offer on a product.
    pub fn new(product: Product, kind: OfferKind<'a>) -> Self {
        Self { product, kind }
    }

    /// Returns the product the offer targets
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Returns the discount rule
    pub fn kind(&self) -> &OfferKind<'a> {
        &self.kind
    }
}

/// The offers active for one checkout.
#[derive(Debug, Clone, Default)]
pub struct OfferRegistry<'a> {
    offers: SlotMap<OfferKey, SpecialOffer<'a>>,
    product_offers: FxHashMap<Product, OfferKey>,
    bundles: SlotMap<BundleKey, Bundle>,
}

impl<'a> OfferRegistry<'a> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an offer on a product, replacing any offer it already has.
    ///
    /// # Errors
    ///
    /// Returns [`OfferError::InvalidPercentage`] if a percentage discount is outside 0% to 100%.
    pub fn register_offer(
        &mut self,
        product: Product,
        kind: OfferKind<'a>,
    ) -> Result<OfferKey, OfferError> {
        if let OfferKind::PercentageDiscount(percent) = kind {
            validate_percent(percent)?;
        }

        let key = self
            .offers
            .insert(SpecialOffer::new(product.clone(), kind));

        if let Some(replaced) = self.product_offers.insert(product, key) {
            if let Some(old) = self.offers.remove(replaced) {
                debug!(product = %old.product(), "replaced existing offer");
            }
        }

        Ok(key)
    }

    /// Register a bundle offer.
    ///
    /// # Errors
    ///
    /// Returns an [`OfferError`] if the bundle fails the checks in [`Bundle::new`].
    pub fn register_bundle(
        &mut self,
        requirements: impl Into<SmallVec<[ProductQuantity; 4]>>,
        percent: Percentage,
    ) -> Result<BundleKey, OfferError> {
        let bundle = Bundle::new(requirements, percent)?;

        Ok(self.bundles.insert(bundle))
    }

    /// The offer currently active for `product`.
    pub fn offer_for(&self, product: &Product) -> Option<&SpecialOffer<'a>> {
        self.product_offers
            .get(product)
            .and_then(|&key| self.offers.get(key))
    }

    /// Look up an offer by key. Replaced offers are no longer found.
    pub fn offer(&self, key: OfferKey) -> Option<&SpecialOffer<'a>> {
        self.offers.get(key)
    }

    /// Look up a bundle by key.
    pub fn bundle(&self, key: BundleKey) -> Option<&Bundle> {
        self.bundles.get(key)
    }

    /// Iterate over the bundles in registration order.
    pub fn bundles(&self) -> impl Iterator<Item = &Bundle> {
        self.bundles.values()
    }

    /// Number of active single-product offers.
    pub fn offer_count(&self) -> usize {
        self.offers.len()
    }

    /// Number of registered bundles.
    pub fn bundle_count(&self) -> usize {
        self.bundles.len()
    }

    /// Whether no offers or bundles are registered.
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty() && self.bundles.is_empty()
    }
}
