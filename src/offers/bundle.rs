//! Bundle Offers
//!
//! A percentage off a set of products bought together. The bundle triggers only when the cart holds
//! at least the required quantity of every member at the same time.

use decimal_percentage::Percentage;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::{
    cart::QuantityLookup,
    offers::{OfferError, validate_percent},
    products::{Product, ProductQuantity},
    quantity::QuantityError,
};

/// A multi-product offer
#[derive(Debug, Clone)]
pub struct Bundle {
    requirements: SmallVec<[ProductQuantity; 4]>,
    percent: Percentage,
}

impl Bundle {
    /// Create a new bundle from its member requirements.
    ///
    /// # Errors
    ///
    /// Returns an [`OfferError`] if:
    /// - `requirements` is empty;
    /// - a requirement asks for a zero quantity;
    /// - a product sold in whole units is required in a fractional quantity;
    /// - a product appears more than once;
    /// - `percent` is outside 0% to 100%.
    pub fn new(
        requirements: impl Into<SmallVec<[ProductQuantity; 4]>>,
        percent: Percentage,
    ) -> Result<Self, OfferError> {
        let requirements = requirements.into();
        let percent = validate_percent(percent)?;

        if requirements.is_empty() {
            return Err(OfferError::EmptyBundle);
        }

        let mut seen = FxHashSet::default();

        for requirement in &requirements {
            let name = requirement.product().name();

            if requirement.quantity().is_zero() {
                return Err(OfferError::ZeroBundleQuantity(name.to_string()));
            }

            if !requirement.product().unit().allows_fractions() && !requirement.quantity().is_whole()
            {
                return Err(QuantityError::Fractional {
                    product: name.to_string(),
                    quantity: requirement.quantity().value(),
                }
                .into());
            }

            if !seen.insert(name) {
                return Err(OfferError::DuplicateBundleProduct(name.to_string()));
            }
        }

        Ok(Self {
            requirements,
            percent,
        })
    }

    /// Member products and the minimum quantity of each.
    pub fn requirements(&self) -> &[ProductQuantity] {
        &self.requirements
    }

    /// Percentage taken off the bundled price.
    pub fn percent(&self) -> Percentage {
        self.percent
    }

    /// Iterate over the member products.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.requirements.iter().map(ProductQuantity::product)
    }

    /// Whether `held` satisfies every requirement simultaneously.
    pub fn is_satisfied_by(&self, held: &impl QuantityLookup) -> bool {
        self.requirements.iter().all(|requirement| {
            held.quantity_of(requirement.product())
                .is_some_and(|quantity| quantity >= requirement.quantity())
        })
    }
}
