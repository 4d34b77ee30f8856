//! Till prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, QuantityLookup},
    catalog::{Catalog, CatalogError, InMemoryCatalog},
    discounts::{Discount, DiscountError},
    fixtures::{Fixture, FixtureError},
    offers::{Bundle, BundleKey, OfferError, OfferKey, OfferKind, OfferRegistry, SpecialOffer},
    pricing::PricingError,
    products::{Product, ProductQuantity, ProductUnit},
    quantity::{Quantity, QuantityError},
    receipt::{Receipt, ReceiptError, ReceiptItem},
    teller::Teller,
};
