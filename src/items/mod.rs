//! Items

use std::fmt::{Display, Formatter, Result as FmtResult};

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use uuid::Uuid;

use crate::products::Product;

pub mod identity;

/// Errors raised while constructing or re-annotating a line item.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineItemError {
    /// The line item code was empty.
    #[error("line item code cannot be empty")]
    EmptyCode,

    /// The original price was negative (product code, minor units).
    #[error("line item {0} original price cannot be negative, got {1}")]
    NegativePrice(String, i64),

    /// The discounted price was negative (product code, minor units).
    #[error("line item {0} discounted price cannot be negative, got {1}")]
    NegativeDiscountedPrice(String, i64),

    /// The discounted price did not reduce the original price.
    #[error(
        "line item {code} discounted price {discounted} must be lower than original price {original}"
    )]
    DiscountedPriceNotLower {
        /// Product code of the line item
        code: String,
        /// Discounted price in minor units
        discounted: i64,
        /// Original price in minor units
        original: i64,
    },

    /// The discounted price currency differs from the original price currency.
    #[error("line item {0} has currency {1}, but discounted price has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// Stable identity of a line item for its lifetime in a basket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineItemId(Uuid);

impl LineItemId {
    /// Generate a fresh random identity.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for LineItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Discount annotation carried by a line item.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountMark<'a> {
    discount_id: String,
    discounted_price: Option<Money<'a, Currency>>,
}

impl<'a> DiscountMark<'a> {
    /// Id of the discount that claimed the item
    pub fn discount_id(&self) -> &str {
        &self.discount_id
    }

    /// Discounted price, absent when the item only triggered the discount
    pub fn discounted_price(&self) -> Option<&Money<'a, Currency>> {
        self.discounted_price.as_ref()
    }
}

/// A product placed in the basket.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem<'a> {
    id: LineItemId,
    code: String,
    name: String,
    original_price: Money<'a, Currency>,
    discount: Option<DiscountMark<'a>>,
}

impl<'a> LineItem<'a> {
    /// Place a product in the basket under the given identity, without any discount.
    pub fn from_product(product: &Product<'a>, id: LineItemId) -> Self {
        Self {
            id,
            code: product.code().to_string(),
            name: product.name().to_string(),
            original_price: *product.price(),
            discount: None,
        }
    }

    /// Create a line item from its parts.
    ///
    /// # Errors
    ///
    /// Returns a [`LineItemError`] if the code is empty, a price is negative, the
    /// discounted price is not lower than the original price, or the currencies differ.
    pub fn new(
        id: LineItemId,
        code: impl Into<String>,
        name: impl Into<String>,
        original_price: Money<'a, Currency>,
        discount: Option<DiscountMark<'a>>,
    ) -> Result<Self, LineItemError> {
        let code = code.into();

        if code.is_empty() {
            return Err(LineItemError::EmptyCode);
        }

        if original_price.to_minor_units() < 0 {
            return Err(LineItemError::NegativePrice(
                code,
                original_price.to_minor_units(),
            ));
        }

        if let Some(discounted) = discount.as_ref().and_then(DiscountMark::discounted_price) {
            validate_discounted_price(&code, &original_price, discounted)?;
        }

        Ok(Self {
            id,
            code,
            name: name.into(),
            original_price,
            discount,
        })
    }

    /// Returns the identity of the item
    pub fn id(&self) -> LineItemId {
        self.id
    }

    /// Returns the product code of the item
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the product name of the item
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the catalog price of the item
    pub fn original_price(&self) -> &Money<'a, Currency> {
        &self.original_price
    }

    /// Returns the discount annotation, if any
    pub fn discount(&self) -> Option<&DiscountMark<'a>> {
        self.discount.as_ref()
    }

    /// Returns the price the customer pays: the discounted price if present, else the original.
    pub fn effective_price(&self) -> Money<'a, Currency> {
        self.discount
            .as_ref()
            .and_then(|mark| mark.discounted_price)
            .unwrap_or(self.original_price)
    }

    /// Copy of this item with the discount annotation removed.
    #[must_use]
    pub fn strip_discount(&self) -> Self {
        Self {
            discount: None,
            ..self.clone()
        }
    }

    /// Copy of this item annotated with a discount.
    ///
    /// A `None` price marks participation in the discount only.
    ///
    /// # Errors
    ///
    /// Returns a [`LineItemError`] if the discounted price is negative, not lower than
    /// the original price, or in another currency.
    pub fn with_discount(
        &self,
        discount_id: impl Into<String>,
        discounted_price: Option<Money<'a, Currency>>,
    ) -> Result<Self, LineItemError> {
        if let Some(discounted) = discounted_price.as_ref() {
            validate_discounted_price(&self.code, &self.original_price, discounted)?;
        }

        Ok(Self {
            discount: Some(DiscountMark {
                discount_id: discount_id.into(),
                discounted_price,
            }),
            ..self.clone()
        })
    }
}

fn validate_discounted_price(
    code: &str,
    original: &Money<'_, Currency>,
    discounted: &Money<'_, Currency>,
) -> Result<(), LineItemError> {
    if discounted.currency() != original.currency() {
        return Err(LineItemError::CurrencyMismatch(
            code.to_string(),
            original.currency().iso_alpha_code,
            discounted.currency().iso_alpha_code,
        ));
    }

    if discounted.to_minor_units() < 0 {
        return Err(LineItemError::NegativeDiscountedPrice(
            code.to_string(),
            discounted.to_minor_units(),
        ));
    }

    if discounted.to_minor_units() >= original.to_minor_units() {
        return Err(LineItemError::DiscountedPriceNotLower {
            code: code.to_string(),
            discounted: discounted.to_minor_units(),
            original: original.to_minor_units(),
        });
    }

    Ok(())
}
