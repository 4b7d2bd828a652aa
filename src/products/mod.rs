//! Products

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

pub mod catalog;

/// Errors raised while constructing a product.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    /// The product code was empty.
    #[error("product code cannot be empty")]
    EmptyCode,

    /// The product name was empty (product code).
    #[error("product {0} name cannot be empty")]
    EmptyName(String),

    /// The product price was negative (product code, minor units).
    #[error("product {0} price cannot be negative, got {1}")]
    NegativePrice(String, i64),
}

/// Immutable catalog record.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    code: String,
    price: Money<'a, Currency>,
    name: String,
}

impl<'a> Product<'a> {
    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] if the code or name is empty, or the price is negative.
    pub fn new(
        code: impl Into<String>,
        price: Money<'a, Currency>,
        name: impl Into<String>,
    ) -> Result<Self, ProductError> {
        let code = code.into();
        let name = name.into();

        if code.is_empty() {
            return Err(ProductError::EmptyCode);
        }

        if price.to_minor_units() < 0 {
            return Err(ProductError::NegativePrice(code, price.to_minor_units()));
        }

        if name.is_empty() {
            return Err(ProductError::EmptyName(code));
        }

        Ok(Self { code, price, name })
    }

    /// Product code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Product price
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Product name
    pub fn name(&self) -> &str {
        &self.name
    }
}
