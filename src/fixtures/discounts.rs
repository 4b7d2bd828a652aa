//! Discount Fixtures

use serde::Deserialize;

use crate::{
    discounts::{Discount, quantity::QuantityDiscount},
    fixtures::FixtureError,
};

/// Wrapper for discounts in YAML
#[derive(Debug, Deserialize)]
pub struct DiscountsFixture {
    /// Discounts in priority order
    pub discounts: Vec<DiscountFixture>,
}

/// Discount fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountFixture {
    /// Quantity-triggered percentage discount
    Quantity {
        /// Discount id
        id: String,

        /// Code of the product that activates the discount
        triggering_code: String,

        /// Code of the product that gets cheaper
        affected_code: String,

        /// Whole percentage off, `1..=100`
        percentage: u8,

        /// Triggering items needed before anything is discounted
        required_quantity: usize,

        /// Affected items discounted per activation
        apply_to_quantity: usize,
    },
}

impl DiscountFixture {
    /// Convert to a boxed discount rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the discount configuration is invalid.
    pub fn try_into_discount(self) -> Result<Box<dyn Discount>, FixtureError> {
        match self {
            DiscountFixture::Quantity {
                id,
                triggering_code,
                affected_code,
                percentage,
                required_quantity,
                apply_to_quantity,
            } => Ok(Box::new(QuantityDiscount::new(
                id,
                triggering_code,
                affected_code,
                percentage,
                required_quantity,
                apply_to_quantity,
            )?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::discounts::DiscountError;

    use super::*;

    #[test]
    fn quantity_fixture_deserializes_and_converts() -> TestResult {
        let yaml = "discounts:\n  - type: quantity\n    id: DQ-01\n    triggering_code: R01\n    affected_code: R01\n    percentage: 50\n    required_quantity: 2\n    apply_to_quantity: 1\n";

        let fixture: DiscountsFixture = serde_norway::from_str(yaml)?;

        let discounts = fixture
            .discounts
            .into_iter()
            .map(DiscountFixture::try_into_discount)
            .collect::<Result<Vec<_>, _>>()?;

        let ids: Vec<&str> = discounts.iter().map(|discount| discount.id()).collect();

        assert_eq!(ids, vec!["DQ-01"]);
        assert!(discounts.iter().all(|discount| discount.can_trigger("R01")));

        Ok(())
    }

    #[test]
    fn unknown_discount_type_fails_to_parse() {
        let yaml = "discounts:\n  - type: bundle\n    id: B-01\n";

        let result: Result<DiscountsFixture, _> = serde_norway::from_str(yaml);

        assert!(result.is_err());
    }

    #[test]
    fn invalid_discount_is_rejected() {
        let fixture = DiscountFixture::Quantity {
            id: "DQ-02".to_string(),
            triggering_code: "R01".to_string(),
            affected_code: "R01".to_string(),
            percentage: 0,
            required_quantity: 2,
            apply_to_quantity: 1,
        };

        assert!(matches!(
            fixture.try_into_discount(),
            Err(FixtureError::Discount(DiscountError::InvalidPercentage(id, 0))) if id == "DQ-02"
        ));
    }
}
