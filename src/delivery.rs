//! Delivery Charges
//!
//! Ordered price-threshold tiers. The first tier whose comparison holds for the
//! basket subtotal sets the delivery cost.

use std::fmt::{Display, Formatter, Result as FmtResult};

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors related to delivery tiers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// A tier threshold was negative (minor units).
    #[error("delivery threshold cannot be negative, got {0}")]
    NegativeThreshold(i64),

    /// A tier cost was negative (minor units).
    #[error("delivery cost cannot be negative, got {0}")]
    NegativeCost(i64),

    /// No tier matched the subtotal.
    #[error("no delivery tier matches subtotal {subtotal} (checked {checked} tiers)")]
    NoMatchingCriterion {
        /// Subtotal in minor units
        subtotal: i64,
        /// Number of tiers inspected
        checked: usize,
    },
}

/// Comparison between a subtotal and a tier threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ComparisonOperator {
    /// `subtotal < threshold`
    #[serde(rename = "<")]
    LessThan,

    /// `subtotal <= threshold`
    #[serde(rename = "<=")]
    LessOrEqual,

    /// `subtotal > threshold`
    #[serde(rename = ">")]
    GreaterThan,

    /// `subtotal >= threshold`
    #[serde(rename = ">=")]
    GreaterOrEqual,
}

impl ComparisonOperator {
    /// Compare a value against a threshold.
    pub fn holds(self, value: i64, threshold: i64) -> bool {
        match self {
            ComparisonOperator::LessThan => value < threshold,
            ComparisonOperator::LessOrEqual => value <= threshold,
            ComparisonOperator::GreaterThan => value > threshold,
            ComparisonOperator::GreaterOrEqual => value >= threshold,
        }
    }
}

impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let symbol = match self {
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessOrEqual => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterOrEqual => ">=",
        };

        f.write_str(symbol)
    }
}

/// A single delivery tier.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeCriterion<'a> {
    operator: ComparisonOperator,
    threshold: Money<'a, Currency>,
    cost: Money<'a, Currency>,
}

impl<'a> ChargeCriterion<'a> {
    /// Create a new tier.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] if the threshold or cost is negative.
    pub fn new(
        operator: ComparisonOperator,
        threshold: Money<'a, Currency>,
        cost: Money<'a, Currency>,
    ) -> Result<Self, DeliveryError> {
        if threshold.to_minor_units() < 0 {
            return Err(DeliveryError::NegativeThreshold(threshold.to_minor_units()));
        }

        if cost.to_minor_units() < 0 {
            return Err(DeliveryError::NegativeCost(cost.to_minor_units()));
        }

        Ok(Self {
            operator,
            threshold,
            cost,
        })
    }

    /// Whether the tier applies to the subtotal.
    pub fn matches(&self, subtotal: &Money<'_, Currency>) -> bool {
        self.operator
            .holds(subtotal.to_minor_units(), self.threshold.to_minor_units())
    }

    /// The comparison operator
    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    /// The threshold compared against
    pub fn threshold(&self) -> &Money<'a, Currency> {
        &self.threshold
    }

    /// The delivery cost when the tier matches
    pub fn cost(&self) -> &Money<'a, Currency> {
        &self.cost
    }
}

/// Resolves a basket subtotal to a delivery cost using ordered tiers.
///
/// Tiers must cover every possible subtotal, typically by ending with an
/// unconditional `>= 0` tier. Gaps are only detected when a subtotal falls into one.
#[derive(Debug, Clone, Default)]
pub struct DeliveryChargeResolver<'a> {
    criteria: Vec<ChargeCriterion<'a>>,
}

impl<'a> DeliveryChargeResolver<'a> {
    /// Create a resolver from tiers in priority order.
    pub fn new(criteria: impl Into<Vec<ChargeCriterion<'a>>>) -> Self {
        Self {
            criteria: criteria.into(),
        }
    }

    /// The tiers in priority order
    pub fn criteria(&self) -> &[ChargeCriterion<'a>] {
        &self.criteria
    }

    /// Delivery cost for the subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::NoMatchingCriterion`] if no tier matches.
    pub fn resolve(
        &self,
        subtotal: &Money<'_, Currency>,
    ) -> Result<Money<'a, Currency>, DeliveryError> {
        let criterion = self
            .criteria
            .iter()
            .find(|criterion| criterion.matches(subtotal))
            .ok_or_else(|| DeliveryError::NoMatchingCriterion {
                subtotal: subtotal.to_minor_units(),
                checked: self.criteria.len(),
            })?;

        debug!(
            subtotal = subtotal.to_minor_units(),
            operator = %criterion.operator,
            threshold = criterion.threshold.to_minor_units(),
            cost = criterion.cost.to_minor_units(),
            "resolved delivery tier"
        );

        Ok(criterion.cost)
    }
}
