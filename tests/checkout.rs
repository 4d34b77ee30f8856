//! Checkout scenarios for the supermarket price list.
//!
//! Prices: toothbrush £0.99, apples £1.99/kg, rice £2.49, toothpaste £1.79,
//! cherry tomatoes £0.69.

use decimal_percentage::Percentage;
use rusty_money::{
    Money,
    iso::{Currency, GBP, USD},
};
use smallvec::smallvec;
use testresult::TestResult;

use till::prelude::*;

struct Shop {
    catalog: InMemoryCatalog<'static>,
    toothbrush: Product,
    apples: Product,
    rice: Product,
    toothpaste: Product,
    cherry_tomatoes: Product,
}

fn pence(minor: i64) -> Money<'static, Currency> {
    Money::from_minor(minor, GBP)
}

fn shop() -> Result<Shop, CatalogError> {
    let toothbrush = Product::each("toothbrush");
    let apples = Product::kilo("apples");
    let rice = Product::each("rice");
    let toothpaste = Product::each("toothpaste");
    let cherry_tomatoes = Product::each("cherry tomatoes");

    let mut catalog = InMemoryCatalog::new(GBP);

    catalog
        .add_product(toothbrush.clone(), pence(99))?
        .add_product(apples.clone(), pence(199))?
        .add_product(rice.clone(), pence(249))?
        .add_product(toothpaste.clone(), pence(179))?
        .add_product(cherry_tomatoes.clone(), pence(69))?;

    Ok(Shop {
        catalog,
        toothbrush,
        apples,
        rice,
        toothpaste,
        cherry_tomatoes,
    })
}

#[test]
fn empty_cart_costs_nothing() -> TestResult {
    let shop = shop()?;
    let teller = Teller::new(&shop.catalog);

    let receipt = teller.checkout(&Cart::new())?;

    assert!(receipt.items().is_empty());
    assert!(receipt.discounts().is_empty());
    assert_eq!(receipt.total_price(), pence(0));

    Ok(())
}

#[test]
fn single_item_without_offers() -> TestResult {
    let shop = shop()?;
    let teller = Teller::new(&shop.catalog);

    let mut cart = Cart::new();
    cart.add_item(&shop.toothbrush)?;

    let receipt = teller.checkout(&cart)?;

    assert_eq!(receipt.total_price(), pence(99));
    assert_eq!(receipt.items().len(), 1);
    assert!(receipt.discounts().is_empty());

    Ok(())
}

#[test]
fn weighed_item_with_percentage_discount() -> TestResult {
    let shop = shop()?;
    let mut teller = Teller::new(&shop.catalog);

    teller.register_offer(
        shop.apples.clone(),
        OfferKind::PercentageDiscount(Percentage::from(0.2)),
    )?;

    let mut cart = Cart::new();
    cart.add_item_quantity(&shop.apples, Quantity::try_from(2.5)?)?;

    let receipt = teller.checkout(&cart)?;

    let discount = receipt.discounts().first().ok_or("missing discount")?;

    assert_eq!(discount.description(), "20% off");
    assert_eq!(discount.amount(), pence(-100));
    assert_eq!(discount.product(), Some(&shop.apples));
    assert_eq!(receipt.items().first().map(ReceiptItem::total_price), Some(pence(498)));
    assert_eq!(receipt.total_price(), pence(398));

    Ok(())
}

#[test]
fn ten_percent_off_rice() -> TestResult {
    let shop = shop()?;
    let mut teller = Teller::new(&shop.catalog);

    teller.register_offer(
        shop.rice.clone(),
        OfferKind::PercentageDiscount(Percentage::from(0.1)),
    )?;

    let mut cart = Cart::new();
    cart.add_item_quantity(&shop.rice, Quantity::units(2))?;

    let receipt = teller.checkout(&cart)?;

    assert_eq!(receipt.total_price(), pence(448));
    assert_eq!(receipt.discounts().len(), 1);

    Ok(())
}

#[test]
fn five_for_amount_with_leftover_unit() -> TestResult {
    let shop = shop()?;
    let mut teller = Teller::new(&shop.catalog);

    teller.register_offer(
        shop.toothpaste.clone(),
        OfferKind::five_for_amount(pence(749)),
    )?;

    let mut cart = Cart::new();
    cart.add_item_quantity(&shop.toothpaste, Quantity::units(5))?;

    assert_eq!(teller.checkout(&cart)?.total_price(), pence(749));

    cart.add_item(&shop.toothpaste)?;

    let receipt = teller.checkout(&cart)?;

    assert_eq!(receipt.total_price(), pence(928));
    assert_eq!(
        receipt.discounts().first().map(Discount::amount),
        Some(pence(-146))
    );

    Ok(())
}

#[test]
fn three_for_two_on_cherry_tomatoes() -> TestResult {
    let shop = shop()?;
    let mut teller = Teller::new(&shop.catalog);

    teller.register_offer(shop.cherry_tomatoes.clone(), OfferKind::ThreeForTwo)?;

    let mut cart = Cart::new();
    cart.add_item_quantity(&shop.cherry_tomatoes, Quantity::units(2))?;

    let receipt = teller.checkout(&cart)?;

    assert_eq!(receipt.total_price(), pence(138));
    assert!(receipt.discounts().is_empty());

    cart.add_item(&shop.cherry_tomatoes)?;

    let receipt = teller.checkout(&cart)?;

    assert_eq!(receipt.total_price(), pence(138));
    assert_eq!(
        receipt.discounts().first().map(Discount::description),
        Some("3 for 2")
    );

    Ok(())
}

#[test]
fn two_for_amount_on_toothbrushes() -> TestResult {
    let shop = shop()?;
    let mut teller = Teller::new(&shop.catalog);

    teller.register_offer(shop.toothbrush.clone(), OfferKind::two_for_amount(pence(99)))?;

    let mut cart = Cart::new();
    cart.add_item(&shop.toothbrush)?.add_item(&shop.toothbrush)?;

    let receipt = teller.checkout(&cart)?;

    assert_eq!(receipt.items().len(), 1);
    assert_eq!(receipt.total_price(), pence(99));
    assert_eq!(receipt.savings()?, pence(99));

    Ok(())
}

#[test]
fn offers_on_different_products_combine() -> TestResult {
    let shop = shop()?;
    let mut teller = Teller::new(&shop.catalog);

    teller.register_offer(shop.cherry_tomatoes.clone(), OfferKind::ThreeForTwo)?;
    teller.register_offer(shop.toothbrush.clone(), OfferKind::two_for_amount(pence(99)))?;

    let mut cart = Cart::new();
    cart.add_item_quantity(&shop.cherry_tomatoes, Quantity::units(3))?
        .add_item_quantity(&shop.toothbrush, Quantity::units(2))?;

    let receipt = teller.checkout(&cart)?;

    assert_eq!(receipt.items().len(), 2);
    assert_eq!(receipt.discounts().len(), 2);
    assert_eq!(receipt.subtotal(), pence(405));
    assert_eq!(receipt.total_price(), pence(237));

    Ok(())
}

#[test]
fn later_offer_replaces_earlier_one() -> TestResult {
    let shop = shop()?;
    let mut teller = Teller::new(&shop.catalog);

    teller.register_offer(shop.rice.clone(), OfferKind::ThreeForTwo)?;
    teller.register_offer(
        shop.rice.clone(),
        OfferKind::PercentageDiscount(Percentage::from(0.1)),
    )?;

    let mut cart = Cart::new();
    cart.add_item_quantity(&shop.rice, Quantity::units(3))?;

    let receipt = teller.checkout(&cart)?;

    assert_eq!(receipt.discounts().len(), 1);
    assert_eq!(
        receipt.discounts().first().map(Discount::description),
        Some("10% off")
    );
    assert_eq!(receipt.total_price(), pence(672));

    Ok(())
}

#[test]
fn bundle_applies_when_every_member_is_present() -> TestResult {
    let shop = shop()?;
    let mut teller = Teller::new(&shop.catalog);

    teller.register_bundle(
        smallvec![
            ProductQuantity::new(shop.toothbrush.clone(), Quantity::ONE),
            ProductQuantity::new(shop.toothpaste.clone(), Quantity::ONE),
        ],
        Percentage::from(0.1),
    )?;

    let mut cart = Cart::new();
    cart.add_item(&shop.toothbrush)?;

    let receipt = teller.checkout(&cart)?;

    assert!(receipt.discounts().is_empty());
    assert_eq!(receipt.total_price(), pence(99));

    cart.add_item(&shop.toothpaste)?;

    let receipt = teller.checkout(&cart)?;
    let discount = receipt.discounts().first().ok_or("missing bundle discount")?;

    assert_eq!(discount.description(), "10% off toothbrush + toothpaste");
    assert_eq!(discount.products(), [shop.toothbrush.clone(), shop.toothpaste.clone()]);
    assert_eq!(discount.amount(), pence(-28));
    assert_eq!(receipt.total_price(), pence(250));

    Ok(())
}

#[test]
fn bundle_stacks_with_single_product_offer() -> TestResult {
    let shop = shop()?;
    let mut teller = Teller::new(&shop.catalog);

    teller.register_offer(shop.toothbrush.clone(), OfferKind::two_for_amount(pence(99)))?;
    teller.register_bundle(
        smallvec![
            ProductQuantity::new(shop.toothbrush.clone(), Quantity::ONE),
            ProductQuantity::new(shop.toothpaste.clone(), Quantity::ONE),
        ],
        Percentage::from(0.1),
    )?;

    let mut cart = Cart::new();
    cart.add_item_quantity(&shop.toothbrush, Quantity::units(2))?
        .add_item(&shop.toothpaste)?;

    let receipt = teller.checkout(&cart)?;

    let amounts: Vec<_> = receipt.discounts().iter().map(Discount::amount).collect();

    assert_eq!(amounts, vec![pence(-99), pence(-28)]);
    assert_eq!(receipt.total_price(), pence(250));

    Ok(())
}

#[test]
fn checkout_is_repeatable() -> TestResult {
    let shop = shop()?;
    let mut teller = Teller::new(&shop.catalog);

    teller.register_offer(shop.cherry_tomatoes.clone(), OfferKind::ThreeForTwo)?;

    let mut cart = Cart::new();
    cart.add_item_quantity(&shop.cherry_tomatoes, Quantity::units(4))?
        .add_item_quantity(&shop.apples, Quantity::try_from(0.75)?)?;

    let first = teller.checkout(&cart)?;
    let second = teller.checkout(&cart)?;

    assert_eq!(first, second);
    assert_eq!(cart.len(), 2);

    Ok(())
}

#[test]
fn unpriced_product_fails_the_checkout() -> TestResult {
    let shop = shop()?;
    let teller = Teller::new(&shop.catalog);

    let mut cart = Cart::new();
    cart.add_item(&shop.rice)?.add_item(&Product::each("bananas"))?;

    let result = teller.checkout(&cart);

    assert!(matches!(result, Err(ReceiptError::UnknownProduct(name)) if name == "bananas"));

    Ok(())
}

#[test]
fn fractional_units_are_rejected_for_counted_products() -> TestResult {
    let shop = shop()?;

    let mut cart = Cart::new();
    let result = cart
        .add_item_quantity(&shop.rice, Quantity::try_from(1.5)?)
        .map(|_| ());

    assert!(matches!(
        result,
        Err(CartError::Quantity(QuantityError::Fractional { .. }))
    ));
    assert!(cart.is_empty());

    Ok(())
}

#[test]
fn group_price_must_use_the_catalog_currency() -> TestResult {
    let shop = shop()?;
    let mut teller = Teller::new(&shop.catalog);

    let result = teller.register_offer(
        shop.toothpaste.clone(),
        OfferKind::five_for_amount(Money::from_minor(749, USD)),
    );

    assert!(matches!(
        result,
        Err(OfferError::CurrencyMismatch { found: "USD", expected: "GBP", .. })
    ));

    let mut cart = Cart::new();
    cart.add_item_quantity(&shop.toothpaste, Quantity::units(5))?;

    let receipt = teller.checkout(&cart)?;

    assert!(receipt.discounts().is_empty());
    assert_eq!(receipt.total_price(), pence(895));

    Ok(())
}

#[test]
fn percentage_over_one_hundred_is_refused() -> TestResult {
    let shop = shop()?;
    let mut teller = Teller::new(&shop.catalog);

    let result = teller.register_offer(
        shop.rice.clone(),
        OfferKind::PercentageDiscount(Percentage::from(1.5)),
    );

    assert!(matches!(result, Err(OfferError::InvalidPercentage(_))));
    assert!(teller.offers().is_empty());

    let mut cart = Cart::new();
    cart.add_item_quantity(&shop.rice, Quantity::units(2))?;

    assert_eq!(teller.checkout(&cart)?.total_price(), pence(498));

    Ok(())
}

#[test]
fn negative_percentage_is_refused() -> TestResult {
    let shop = shop()?;
    let mut teller = Teller::new(&shop.catalog);

    let result = teller.register_offer(
        shop.rice.clone(),
        OfferKind::PercentageDiscount(Percentage::from(-0.2)),
    );

    assert!(matches!(result, Err(OfferError::InvalidPercentage(_))));

    Ok(())
}
