//! Discounts
//!
//! Turns a priced cart line and its offer, or a bundle and the whole cart, into a discount entry
//! for the receipt. Discount amounts are negative: they are added to the sum of line totals.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

use crate::{
    cart::QuantityLookup,
    catalog::Catalog,
    offers::{
        Bundle, OfferError, OfferKind, SpecialOffer, THREE_FOR_TWO_GROUP, validate_percent,
    },
    pricing::{PricingError, extended_minor, minor_decimal, round_to_money},
    products::Product,
    quantity::Quantity,
};

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// A bundle member has no catalog price.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// Wrapped pricing arithmetic error.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The offer being evaluated is misconfigured.
    #[error(transparent)]
    Offer(#[from] OfferError),
}

/// A discount applied to the receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct Discount<'a> {
    products: SmallVec<[Product; 2]>,
    description: String,
    amount: Money<'a, Currency>,
}

impl<'a> Discount<'a> {
    /// Create a new discount.
    pub fn new(
        products: impl Into<SmallVec<[Product; 2]>>,
        description: impl Into<String>,
        amount: Money<'a, Currency>,
    ) -> Self {
        Self {
            products: products.into(),
            description: description.into(),
            amount,
        }
    }

    /// The product the discount was granted on. For bundles this is the first member.
    pub fn product(&self) -> Option<&Product> {
        self.products.first()
    }

    /// Every product the discount covers.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Human readable description of the offer.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Discount amount, zero or negative.
    pub fn amount(&self) -> Money<'a, Currency> {
        self.amount
    }
}

/// Calculates the discount an offer grants on a cart line.
///
/// Returns `Ok(None)` when the line does not qualify, or when the offer would not reduce the price.
///
/// # Errors
///
/// Returns a [`DiscountError`] if:
/// - a percentage discount lies outside 0% to 100%;
/// - a group price is in another currency than the unit price;
/// - the arithmetic cannot be represented in minor units.
pub fn offer_discount<'a>(
    offer: &SpecialOffer<'a>,
    quantity: Quantity,
    unit_price: &Money<'a, Currency>,
) -> Result<Option<Discount<'a>>, DiscountError> {
    let currency = unit_price.currency();

    if let OfferKind::PercentageDiscount(percent) = offer.kind() {
        validate_percent(*percent)?;
    }

    let Some((description, minor)) = discount_minor(offer.kind(), quantity, unit_price)? else {
        return Ok(None);
    };

    let amount = round_to_money(minor, currency)?;

    if amount.to_minor_units() >= 0 {
        return Ok(None);
    }

    Ok(Some(Discount::new(
        smallvec![offer.product().clone()],
        description,
        amount,
    )))
}

/// Calculates the discount a bundle grants on the cart as a whole.
///
/// The bundle applies once, to the minimum quantity of each member, however much more the cart
/// holds.
///
/// # Errors
///
/// Returns a [`DiscountError`] if a member has no catalog price, or the arithmetic cannot be
/// represented in minor units.
pub fn bundle_discount<'a, C>(
    bundle: &Bundle,
    held: &impl QuantityLookup,
    catalog: &C,
) -> Result<Option<Discount<'a>>, DiscountError>
where
    C: Catalog<'a> + ?Sized,
{
    if !bundle.is_satisfied_by(held) {
        return Ok(None);
    }

    let bundled_minor = bundle
        .requirements()
        .iter()
        .try_fold(Decimal::ZERO, |acc, requirement| {
            let unit_price = catalog
                .unit_price(requirement.product())
                .ok_or_else(|| DiscountError::UnknownProduct(requirement.product().to_string()))?;

            let extended = extended_minor(&unit_price, requirement.quantity())?;

            acc.checked_add(extended)
                .ok_or(DiscountError::Pricing(PricingError::Overflow))
        })?;

    let minor = percent_of(bundle.percent(), bundled_minor)?;
    let amount = round_to_money(-minor, catalog.currency())?;

    if amount.to_minor_units() >= 0 {
        return Ok(None);
    }

    let names: SmallVec<[&str; 4]> = bundle.products().map(Product::name).collect();

    Ok(Some(Discount::new(
        bundle.products().cloned().collect::<SmallVec<[Product; 2]>>(),
        format!("{} off {}", percent_label(bundle.percent()), names.join(" + ")),
        amount,
    )))
}

/// Work out the unrounded discount in minor units, with its description.
fn discount_minor(
    kind: &OfferKind<'_>,
    quantity: Quantity,
    unit_price: &Money<'_, Currency>,
) -> Result<Option<(String, Decimal)>, PricingError> {
    match kind {
        OfferKind::PercentageDiscount(percent) => {
            if quantity.is_zero() {
                return Ok(None);
            }

            let minor = percent_of(*percent, extended_minor(unit_price, quantity)?)?;

            Ok(Some((format!("{} off", percent_label(*percent)), -minor)))
        }
        OfferKind::ThreeForTwo => {
            let group = Decimal::from(THREE_FOR_TWO_GROUP);

            if quantity.value() < group {
                return Ok(None);
            }

            let free = (quantity.value() / group).floor();
            let minor = free
                .checked_mul(minor_decimal(unit_price))
                .ok_or(PricingError::Overflow)?;

            Ok(Some((
                format!("{THREE_FOR_TWO_GROUP} for {}", THREE_FOR_TWO_GROUP - 1),
                -minor,
            )))
        }
        OfferKind::NForAmount { count, amount } => {
            if amount.currency() != unit_price.currency() {
                return Err(MoneyError::CurrencyMismatch {
                    expected: unit_price.currency().iso_alpha_code,
                    actual: amount.currency().iso_alpha_code,
                }
                .into());
            }

            let group = Decimal::from(count.get());

            if quantity.value() < group {
                return Ok(None);
            }

            let groups = (quantity.value() / group).floor();
            let remainder = quantity.value() - groups * group;

            let grouped_cost = groups
                .checked_mul(minor_decimal(amount))
                .ok_or(PricingError::Overflow)?;
            let remainder_cost = remainder
                .checked_mul(minor_decimal(unit_price))
                .ok_or(PricingError::Overflow)?;
            let full_cost = extended_minor(unit_price, quantity)?;

            let minor = grouped_cost
                .checked_add(remainder_cost)
                .and_then(|actual| actual.checked_sub(full_cost))
                .ok_or(PricingError::Overflow)?;

            Ok(Some((format!("{count} for {amount}"), minor)))
        }
    }
}

/// Decimal places kept from a percentage, enough to drop float noise from `Percentage::from(f64)`.
const PERCENT_SCALE: u32 = 10;

/// The percentage as a plain fraction, e.g. 0.2 for 20%.
fn fraction(percent: Percentage) -> Decimal {
    // decimal_percentage doesn't expose the underlying Decimal
    (percent * Decimal::ONE).round_dp(PERCENT_SCALE)
}

/// Apply a percentage to a decimal amount.
fn percent_of(percent: Percentage, minor: Decimal) -> Result<Decimal, PricingError> {
    fraction(percent)
        .checked_mul(minor)
        .ok_or(PricingError::Overflow)
}

/// Format a percentage in percentage points, e.g. "20%".
fn percent_label(percent: Percentage) -> String {
    format!("{}%", (fraction(percent) * Decimal::ONE_HUNDRED).normalize())
}
