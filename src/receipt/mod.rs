//! Receipt

use std::io;

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    discounts::{Discount, DiscountError},
    pricing::PricingError,
    products::Product,
    quantity::Quantity,
};

mod table;

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A cart line could not be priced by the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// Error calculating a line or discount amount.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Error calculating a line total or sum.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Writing the receipt failed.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// A priced cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptItem<'a> {
    product: Product,
    quantity: Quantity,
    unit_price: Money<'a, Currency>,
    total_price: Money<'a, Currency>,
}

impl<'a> ReceiptItem<'a> {
    /// Create a new receipt line.
    pub fn new(
        product: Product,
        quantity: Quantity,
        unit_price: Money<'a, Currency>,
        total_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            product,
            quantity,
            unit_price,
            total_price,
        }
    }

    /// Returns the product
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Returns the quantity bought
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Undiscounted unit price
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// Undiscounted line total
    pub fn total_price(&self) -> Money<'a, Currency> {
        self.total_price
    }
}

/// Final receipt for a checked out cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt<'a> {
    /// Priced lines, in cart order
    items: Vec<ReceiptItem<'a>>,

    /// Discounts granted, single-product offers first, then bundles
    discounts: SmallVec<[Discount<'a>; 4]>,

    /// Sum of the undiscounted line totals
    subtotal: Money<'a, Currency>,

    /// Amount to pay: subtotal plus the (negative) discount amounts
    total: Money<'a, Currency>,

    /// Currency used for all monetary values
    currency: &'a Currency,
}

impl<'a> Receipt<'a> {
    /// Create a new receipt with the given details.
    pub fn new(
        items: Vec<ReceiptItem<'a>>,
        discounts: SmallVec<[Discount<'a>; 4]>,
        subtotal: Money<'a, Currency>,
        total: Money<'a, Currency>,
        currency: &'a Currency,
    ) -> Self {
        Self {
            items,
            discounts,
            subtotal,
            total,
            currency,
        }
    }

    /// Priced lines, in cart order.
    pub fn items(&self) -> &[ReceiptItem<'a>] {
        &self.items
    }

    /// Discounts granted.
    pub fn discounts(&self) -> &[Discount<'a>] {
        &self.discounts
    }

    /// Total cost before any discounts
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total amount to pay
    pub fn total_price(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Calculate the savings made by applying discounts.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Writes the receipt as a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        table::write_receipt(&mut out, self)
    }
}
