//! Teller
//!
//! Checks out a cart: prices each line through the catalog, applies the offer registered for the
//! line's product, then evaluates bundles against the whole cart.

use decimal_percentage::Percentage;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    cart::Cart,
    catalog::Catalog,
    discounts::{Discount, bundle_discount, offer_discount},
    offers::{BundleKey, OfferError, OfferKey, OfferKind, OfferRegistry},
    pricing::{line_total, sum},
    products::{Product, ProductQuantity},
    receipt::{Receipt, ReceiptError, ReceiptItem},
};

/// Prices carts against a catalog and a set of offers.
#[derive(Debug)]
pub struct Teller<'c, 'a, C: Catalog<'a>> {
    catalog: &'c C,
    offers: OfferRegistry<'a>,
}

impl<'c, 'a, C: Catalog<'a>> Teller<'c, 'a, C> {
    /// Create a teller with no offers.
    pub fn new(catalog: &'c C) -> Self {
        Self::with_offers(catalog, OfferRegistry::new())
    }

    /// Create a teller with a preconfigured offer registry.
    pub fn with_offers(catalog: &'c C, offers: OfferRegistry<'a>) -> Self {
        Self { catalog, offers }
    }

    /// Register an offer on a product, replacing any offer it already has.
    ///
    /// # Errors
    ///
    /// Returns an [`OfferError`] if:
    /// - a group price is not in the catalog currency;
    /// - a percentage discount is outside 0% to 100%.
    pub fn register_offer(
        &mut self,
        product: Product,
        kind: OfferKind<'a>,
    ) -> Result<OfferKey, OfferError> {
        kind.ensure_currency(&product, self.catalog.currency())?;

        self.offers.register_offer(product, kind)
    }

    /// Register a bundle offer.
    ///
    /// # Errors
    ///
    /// Returns an [`OfferError`] if the bundle is misconfigured.
    pub fn register_bundle(
        &mut self,
        requirements: impl Into<SmallVec<[ProductQuantity; 4]>>,
        percent: Percentage,
    ) -> Result<BundleKey, OfferError> {
        self.offers.register_bundle(requirements, percent)
    }

    /// Returns the active offers
    pub fn offers(&self) -> &OfferRegistry<'a> {
        &self.offers
    }

    /// Price a cart and build its receipt.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if:
    /// - a cart line has no catalog price (`ReceiptError::UnknownProduct`);
    /// - an amount cannot be represented in minor units.
    pub fn checkout(&self, cart: &Cart) -> Result<Receipt<'a>, ReceiptError> {
        let currency = self.catalog.currency();

        debug!(
            lines = cart.len(),
            currency = currency.iso_alpha_code,
            "checking out cart"
        );

        let mut items = Vec::with_capacity(cart.len());
        let mut discounts: SmallVec<[Discount<'a>; 4]> = SmallVec::new();

        for line in cart.iter() {
            let product = line.product();

            let unit_price = self
                .catalog
                .unit_price(product)
                .ok_or_else(|| ReceiptError::UnknownProduct(product.name().to_string()))?;

            let total_price = line_total(&unit_price, line.quantity())?;

            items.push(ReceiptItem::new(
                product.clone(),
                line.quantity(),
                unit_price,
                total_price,
            ));

            let Some(offer) = self.offers.offer_for(product) else {
                continue;
            };

            if let Some(discount) = offer_discount(offer, line.quantity(), &unit_price)? {
                trace!(
                    %product,
                    description = discount.description(),
                    amount = %discount.amount(),
                    "applied offer"
                );

                discounts.push(discount);
            }
        }

        for bundle in self.offers.bundles() {
            if let Some(discount) = bundle_discount(bundle, cart, self.catalog)? {
                trace!(
                    description = discount.description(),
                    amount = %discount.amount(),
                    "applied bundle"
                );

                discounts.push(discount);
            }
        }

        let subtotal = sum(items.iter().map(ReceiptItem::total_price), currency)?;
        let discounted = sum(discounts.iter().map(Discount::amount), currency)?;
        let total = subtotal.add(discounted)?;

        debug!(
            items = items.len(),
            discounts = discounts.len(),
            %subtotal,
            %total,
            "checked out cart"
        );

        Ok(Receipt::new(items, discounts, subtotal, total, currency))
    }
}
