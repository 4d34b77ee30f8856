//! Till
//!
//! Till prices a shopping cart against a product catalog and a set of special offers, producing an
//! itemised receipt with line totals, applied discounts and a grand total.

pub mod cart;
pub mod catalog;
pub mod discounts;
pub mod fixtures;
pub mod offers;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod quantity;
pub mod receipt;
pub mod teller;
pub mod utils;
