//! Products

use std::fmt;

use serde::Deserialize;

use crate::quantity::Quantity;

/// How a product is measured at the till.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductUnit {
    /// Sold in whole units.
    Each,

    /// Sold by weight, in kilograms.
    Kilo,
}

impl ProductUnit {
    /// Whether quantities of this unit may be fractional.
    pub fn allows_fractions(self) -> bool {
        matches!(self, ProductUnit::Kilo)
    }
}

/// Product
///
/// The name identifies a product for the lifetime of a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Product {
    name: String,
    unit: ProductUnit,
}

impl Product {
    /// Create a new product.
    pub fn new(name: impl Into<String>, unit: ProductUnit) -> Self {
        Self {
            name: name.into(),
            unit,
        }
    }

    /// Create a product sold in whole units.
    pub fn each(name: impl Into<String>) -> Self {
        Self::new(name, ProductUnit::Each)
    }

    /// Create a product sold by weight.
    pub fn kilo(name: impl Into<String>) -> Self {
        Self::new(name, ProductUnit::Kilo)
    }

    /// Product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Product unit
    pub fn unit(&self) -> ProductUnit {
        self.unit
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A product paired with a quantity, as held in a cart or required by a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuantity {
    product: Product,
    quantity: Quantity,
}

impl ProductQuantity {
    /// Create a new product quantity.
    pub fn new(product: Product, quantity: Quantity) -> Self {
        Self { product, quantity }
    }

    /// Returns the product
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Returns the quantity
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub(crate) fn quantity_mut(&mut self) -> &mut Quantity {
        &mut self.quantity
    }
}
