//! Checkout prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketError},
    delivery::{ChargeCriterion, ComparisonOperator, DeliveryChargeResolver, DeliveryError},
    discounts::{
        Discount, DiscountError,
        applicator::{DiscountAllocation, DiscountApplicator},
        quantity::QuantityDiscount,
    },
    fixtures::{Fixture, FixtureError},
    items::{DiscountMark, LineItem, LineItemError, LineItemId},
    products::{
        Product, ProductError,
        catalog::{CatalogError, InMemoryCatalog, ProductCatalog},
    },
    receipt::{Receipt, ReceiptError, ReceiptLine},
};
