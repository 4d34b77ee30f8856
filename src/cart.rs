//! Cart

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    products::{Product, ProductQuantity},
    quantity::{Quantity, QuantityError},
};

/// Errors related to cart construction.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The quantity was rejected.
    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

/// Read access to the quantity held for each product.
pub trait QuantityLookup {
    /// Quantity held for `product`, or `None` if it is not held at all.
    fn quantity_of(&self, product: &Product) -> Option<Quantity>;
}

/// Shopping cart
///
/// Holds one line per distinct product, in the order products were first added. Adding a product
/// again accumulates onto its existing line.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<ProductQuantity>,
    index: FxHashMap<Product, usize>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single unit of a product.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the accumulated quantity overflows.
    pub fn add_item(&mut self, product: &Product) -> Result<&mut Self, CartError> {
        self.add_item_quantity(product, Quantity::ONE)
    }

    /// Add a quantity of a product.
    ///
    /// Adding a zero quantity leaves the cart untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if:
    /// - the product is sold in whole units and `quantity` is fractional;
    /// - the accumulated quantity overflows.
    pub fn add_item_quantity(
        &mut self,
        product: &Product,
        quantity: Quantity,
    ) -> Result<&mut Self, CartError> {
        if !product.unit().allows_fractions() && !quantity.is_whole() {
            return Err(QuantityError::Fractional {
                product: product.name().to_string(),
                quantity: quantity.value(),
            }
            .into());
        }

        if quantity.is_zero() {
            return Ok(self);
        }

        let existing = self
            .index
            .get(product)
            .and_then(|&idx| self.lines.get_mut(idx));

        if let Some(line) = existing {
            let total = line.quantity().checked_add(quantity)?;
            *line.quantity_mut() = total;
        } else {
            self.index.insert(product.clone(), self.lines.len());
            self.lines
                .push(ProductQuantity::new(product.clone(), quantity));
        }

        Ok(self)
    }

    /// Iterate over the cart lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ProductQuantity> {
        self.lines.iter()
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl QuantityLookup for Cart {
    fn quantity_of(&self, product: &Product) -> Option<Quantity> {
        self.index
            .get(product)
            .and_then(|&idx| self.lines.get(idx))
            .map(ProductQuantity::quantity)
    }
}
