//! Discounts
//!
//! A discount decides which line items it claims and how their prices change. The
//! [`applicator::DiscountApplicator`] distributes a basket among the configured
//! discounts; each discount kind only has to implement [`Discount`].

use std::fmt::Debug;

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

use crate::items::{LineItem, LineItemError};

pub mod applicator;
pub mod quantity;

/// Errors specific to discount configuration and application.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// The discount id was empty.
    #[error("discount id cannot be empty")]
    EmptyId,

    /// The triggering product code was empty (discount id).
    #[error("discount {0} triggering code cannot be empty")]
    EmptyTriggeringCode(String),

    /// The affected product code was empty (discount id).
    #[error("discount {0} affected code cannot be empty")]
    EmptyAffectedCode(String),

    /// The percentage was outside `1..=100` (discount id, percentage).
    #[error("discount {0} percentage must be > 0 and <= 100, got {1}")]
    InvalidPercentage(String, u8),

    /// The required quantity was zero (discount id).
    #[error("discount {0} required quantity must be > 0")]
    InvalidRequiredQuantity(String),

    /// The apply-to quantity was zero (discount id).
    #[error("discount {0} apply-to quantity must be > 0")]
    InvalidApplyToQuantity(String),

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A discount was asked to act on an item it cannot claim.
    ///
    /// This indicates a bug in distribution, not a configuration problem.
    #[error("discount {discount} cannot be applied to product {code}")]
    IncompatibleItem {
        /// Id of the discount
        discount: String,
        /// Code of the offending item
        code: String,
    },

    /// Re-annotating an item failed validation.
    #[error(transparent)]
    LineItem(#[from] LineItemError),
}

/// A discount rule.
///
/// Rules are shared, read-only configuration: every method takes `&self` and returns
/// new items rather than mutating its input.
pub trait Discount: Debug + Send + Sync {
    /// Identifier recorded on every item the discount claims.
    fn id(&self) -> &str;

    /// Whether an item with this code can activate the discount.
    fn can_trigger(&self, code: &str) -> bool;

    /// The items the discount would claim from `items`, or an empty list if it does not fire.
    fn determine_affected_items<'a>(&self, items: &[LineItem<'a>]) -> Vec<LineItem<'a>>;

    /// Re-annotate the claimed items.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if an item cannot be claimed by this discount or
    /// its new price fails validation.
    fn apply<'a>(&self, items: &[LineItem<'a>]) -> Result<Vec<LineItem<'a>>, DiscountError>;
}

/// Convert a whole-number percentage (`50` for 50%) into a [`Percentage`].
pub fn percentage_from_points(points: u8) -> Percentage {
    Percentage::from(Decimal::new(i64::from(points), 2))
}

/// Take a percentage of a minor unit amount, truncating toward zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the result overflows.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage crate doesn't actually expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::ToZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}
