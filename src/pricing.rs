//! Pricing
//!
//! Money is held in minor units. Intermediate products of a price and a quantity are worked out in
//! `Decimal` and rounded back to minor units, midpoint away from zero.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::quantity::Quantity;

/// Errors that can occur while pricing.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The result could not be represented in minor units.
    #[error("price arithmetic overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A money amount as a decimal number of minor units.
pub fn minor_decimal(money: &Money<'_, Currency>) -> Decimal {
    Decimal::from(money.to_minor_units())
}

/// Round a decimal number of minor units back to money.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the rounded value does not fit in `i64`.
pub fn round_to_money(
    minor: Decimal,
    currency: &Currency,
) -> Result<Money<'_, Currency>, PricingError> {
    let rounded = minor
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(rounded, currency))
}

/// Multiply a unit price by a quantity, in unrounded minor units.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product is out of range.
pub fn extended_minor(
    unit_price: &Money<'_, Currency>,
    quantity: Quantity,
) -> Result<Decimal, PricingError> {
    minor_decimal(unit_price)
        .checked_mul(quantity.value())
        .ok_or(PricingError::Overflow)
}

/// Undiscounted total for a cart line.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the total is out of range.
pub fn line_total<'a>(
    unit_price: &Money<'a, Currency>,
    quantity: Quantity,
) -> Result<Money<'a, Currency>, PricingError> {
    round_to_money(extended_minor(unit_price, quantity)?, unit_price.currency())
}

/// Sum a sequence of amounts, starting from zero in `currency`.
///
/// # Errors
///
/// Returns [`PricingError::Money`] on a currency mismatch.
pub fn sum<'a>(
    amounts: impl IntoIterator<Item = Money<'a, Currency>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    let total = amounts
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, amount| acc.add(amount))?;

    Ok(total)
}
