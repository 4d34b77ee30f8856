//! Quantities

use std::fmt;

use rust_decimal::{Decimal, prelude::FromPrimitive};
use thiserror::Error;

/// Errors raised when a quantity is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum QuantityError {
    /// Quantities cannot be negative.
    #[error("quantity {0} is negative")]
    Negative(Decimal),

    /// NaN or infinite input.
    #[error("quantity is not a finite number")]
    NotFinite,

    /// A product sold in whole units was given a fractional quantity.
    #[error("{product} is sold in whole units, got quantity {quantity}")]
    Fractional {
        /// Product name
        product: String,

        /// Rejected quantity
        quantity: Decimal,
    },

    /// Accumulating quantities overflowed.
    #[error("quantity overflowed")]
    Overflow,
}

/// A non-negative amount of a product: a unit count or a weight in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Quantity(Decimal);

impl Quantity {
    /// No quantity
    pub const ZERO: Quantity = Quantity(Decimal::ZERO);

    /// A single unit
    pub const ONE: Quantity = Quantity(Decimal::ONE);

    /// Create a quantity from a decimal value.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Negative`] if the value is below zero.
    pub fn new(value: Decimal) -> Result<Self, QuantityError> {
        if value < Decimal::ZERO {
            return Err(QuantityError::Negative(value));
        }

        Ok(Self(value.normalize()))
    }

    /// Create a quantity of whole units.
    pub fn units(count: u32) -> Self {
        Self(Decimal::from(count))
    }

    /// Returns the underlying decimal value.
    pub fn value(self) -> Decimal {
        self.0
    }

    /// Whether the quantity has no fractional part.
    pub fn is_whole(self) -> bool {
        self.0.fract().is_zero()
    }

    /// Whether the quantity is zero.
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Add two quantities.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Overflow`] if the sum is out of range.
    pub fn checked_add(self, other: Quantity) -> Result<Self, QuantityError> {
        self.0
            .checked_add(other.0)
            .map(|sum| Self(sum.normalize()))
            .ok_or(QuantityError::Overflow)
    }
}

impl TryFrom<f64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(QuantityError::NotFinite);
        }

        let value = Decimal::from_f64(value).ok_or(QuantityError::NotFinite)?;

        Self::new(value)
    }
}

impl TryFrom<Decimal> for Quantity {
    type Error = QuantityError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
