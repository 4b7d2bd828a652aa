//! Checkout
//!
//! Checkout is a basket pricing engine: products are added one code at a time and the
//! whole basket is re-priced against an ordered set of discount rules, then a delivery
//! charge is resolved from the discounted subtotal.

pub mod basket;
pub mod delivery;
pub mod discounts;
pub mod fixtures;
pub mod items;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod utils;
