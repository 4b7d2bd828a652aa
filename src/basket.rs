//! Basket
//!
//! A shopping basket bound to a product catalog, an ordered set of discounts and a
//! delivery resolver. Every addition re-prices the whole basket from scratch.

use std::iter;

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::{Span, debug, field};

use crate::{
    delivery::{DeliveryChargeResolver, DeliveryError},
    discounts::{DiscountError, applicator::DiscountApplicator},
    items::{LineItem, LineItemId, identity::merge_by_identity},
    pricing::{effective_total, original_total},
    products::catalog::{CatalogError, ProductCatalog},
};

/// Errors related to basket operations or totals.
#[derive(Debug, Error)]
pub enum BasketError {
    /// The product code is not in the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A product is priced in another currency (code, product currency, basket currency).
    #[error("Product {0} has currency {1}, but basket has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// A discount rejected the items it was allocated.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// No delivery tier matched the subtotal.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// An item was not found in the basket.
    #[error("Item {0} not found")]
    ItemNotFound(usize),
}

/// Basket
#[derive(Debug)]
pub struct Basket<'a> {
    catalog: &'a dyn ProductCatalog<'a>,
    discounts: &'a DiscountApplicator,
    delivery: &'a DeliveryChargeResolver<'a>,
    currency: &'static Currency,
    items: Vec<LineItem<'a>>,
}

impl<'a> Basket<'a> {
    /// Create an empty basket.
    #[must_use]
    pub fn new(
        catalog: &'a dyn ProductCatalog<'a>,
        discounts: &'a DiscountApplicator,
        delivery: &'a DeliveryChargeResolver<'a>,
        currency: &'static Currency,
    ) -> Self {
        Basket {
            catalog,
            discounts,
            delivery,
            currency,
            items: Vec::new(),
        }
    }

    /// Add one unit of a product and re-price the basket.
    ///
    /// Existing items keep their identities but lose their discount annotations; the
    /// discounts are then distributed over the whole basket again and the results are
    /// merged back by identity. The basket is left untouched if any step fails.
    ///
    /// Distribution re-scans the whole basket for every triggering item and recurses
    /// into what each claim leaves over, so its cost grows exponentially with the number
    /// of items sharing a triggering code. A dozen or so identical items are enough for a
    /// single addition to take seconds.
    ///
    /// # Errors
    ///
    /// Returns a [`BasketError`] if the code is unknown, the product is priced in
    /// another currency, or a discount rejects its allocation.
    #[tracing::instrument(
        name = "basket.add_product",
        skip(self),
        fields(items = self.items.len(), allocations = field::Empty),
        err
    )]
    pub fn add_product(&mut self, code: &str) -> Result<(), BasketError> {
        let product = self.catalog.product(code)?;
        let product_currency = product.price().currency();

        if product_currency != self.currency {
            return Err(BasketError::CurrencyMismatch(
                code.to_string(),
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let added = LineItem::from_product(product, LineItemId::generate());

        let reset: Vec<LineItem<'a>> = self
            .items
            .iter()
            .map(LineItem::strip_discount)
            .chain(iter::once(added))
            .collect();

        self.items = self.reprice(&reset)?;

        debug!(code, items = self.items.len(), "added product to basket");

        Ok(())
    }

    fn reprice(&self, items: &[LineItem<'a>]) -> Result<Vec<LineItem<'a>>, BasketError> {
        let allocations = self.discounts.distribute(items);

        Span::current().record("allocations", allocations.len());

        let discounted = self.discounts.apply_all(&allocations)?;

        Ok(merge_by_identity([items, discounted.as_slice()]))
    }

    /// Sum of the effective prices of the items, before delivery.
    ///
    /// # Errors
    ///
    /// Returns a [`BasketError`] if there was a money arithmetic or currency mismatch error.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, BasketError> {
        Ok(effective_total(&self.items, self.currency)?)
    }

    /// Sum of the catalog prices of the items, ignoring discounts.
    ///
    /// # Errors
    ///
    /// Returns a [`BasketError`] if there was a money arithmetic or currency mismatch error.
    pub fn original_subtotal(&self) -> Result<Money<'a, Currency>, BasketError> {
        Ok(original_total(&self.items, self.currency)?)
    }

    /// Delivery cost for the current subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`BasketError`] if the subtotal cannot be calculated or no tier matches.
    pub fn delivery_charge(&self) -> Result<Money<'a, Currency>, BasketError> {
        let subtotal = self.subtotal()?;

        Ok(self.delivery.resolve(&subtotal)?)
    }

    /// Subtotal plus delivery.
    ///
    /// # Errors
    ///
    /// Returns a [`BasketError`] if the subtotal cannot be calculated or no tier matches.
    pub fn total(&self) -> Result<Money<'a, Currency>, BasketError> {
        let subtotal = self.subtotal()?;
        let delivery = self.delivery.resolve(&subtotal)?;

        Ok(subtotal.add(delivery)?)
    }

    /// Get an item from the basket.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError::ItemNotFound` if the item is not found.
    pub fn get_item(&self, item: usize) -> Result<&LineItem<'a>, BasketError> {
        self.items.get(item).ok_or(BasketError::ItemNotFound(item))
    }

    /// The items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem<'a>] {
        &self.items
    }

    /// Iterate over the items in the basket.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.items.iter()
    }

    /// Get the number of items in the basket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the basket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the basket.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
