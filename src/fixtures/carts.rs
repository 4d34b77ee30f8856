//! Cart Fixtures

use serde::Deserialize;

use crate::{fixtures::FixtureError, quantity::Quantity};

/// Wrapper for a cart in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Cart lines, in scan order
    pub items: Vec<CartLineFixture>,
}

/// A cart line from YAML
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Product key
    pub product: String,

    /// Units or kilograms
    #[serde(default = "default_quantity")]
    pub quantity: f64,
}

fn default_quantity() -> f64 {
    1.0
}

impl CartLineFixture {
    /// The line quantity as a validated quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity is negative or not finite.
    pub fn quantity(&self) -> Result<Quantity, FixtureError> {
        Ok(Quantity::try_from(self.quantity)?)
    }
}
