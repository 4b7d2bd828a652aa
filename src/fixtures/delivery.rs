//! Delivery Fixtures

use serde::Deserialize;

use crate::{
    delivery::{ChargeCriterion, ComparisonOperator},
    fixtures::{FixtureError, products::parse_money},
};

/// Wrapper for delivery tiers in YAML
#[derive(Debug, Deserialize)]
pub struct DeliveryFixture {
    /// Tiers in priority order
    pub delivery: Vec<ChargeCriterionFixture>,
}

/// Delivery tier from YAML
#[derive(Debug, Deserialize)]
pub struct ChargeCriterionFixture {
    /// Comparison applied as `subtotal <operator> threshold`
    pub operator: ComparisonOperator,

    /// Threshold price string (e.g., "50.00 USD")
    pub threshold: String,

    /// Delivery cost price string (e.g., "4.95 USD")
    pub cost: String,
}

impl TryFrom<ChargeCriterionFixture> for ChargeCriterion<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ChargeCriterionFixture) -> Result<Self, Self::Error> {
        let threshold = parse_money(&fixture.threshold)?;
        let cost = parse_money(&fixture.cost)?;

        Ok(ChargeCriterion::new(fixture.operator, threshold, cost)?)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::delivery::DeliveryError;

    use super::*;

    #[test]
    fn tiers_deserialize_in_order() -> TestResult {
        let yaml = "delivery:\n  - operator: \"<\"\n    threshold: 50.00 USD\n    cost: 4.95 USD\n  - operator: \">=\"\n    threshold: 50.00 USD\n    cost: 0.00 USD\n";

        let fixture: DeliveryFixture = serde_norway::from_str(yaml)?;

        let criteria = fixture
            .delivery
            .into_iter()
            .map(ChargeCriterion::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let operators: Vec<ComparisonOperator> =
            criteria.iter().map(ChargeCriterion::operator).collect();

        assert_eq!(
            operators,
            vec![
                ComparisonOperator::LessThan,
                ComparisonOperator::GreaterOrEqual
            ]
        );
        assert_eq!(
            criteria.first().map(ChargeCriterion::cost),
            Some(&Money::from_minor(495, USD))
        );

        Ok(())
    }

    #[test]
    fn negative_cost_is_rejected() {
        let fixture = ChargeCriterionFixture {
            operator: ComparisonOperator::LessThan,
            threshold: "10.00 USD".to_string(),
            cost: "-1.00 USD".to_string(),
        };

        assert!(matches!(
            ChargeCriterion::try_from(fixture),
            Err(FixtureError::Delivery(DeliveryError::NegativeCost(-100)))
        ));
    }

    #[test]
    fn unknown_operator_fails_to_parse() {
        let yaml = "delivery:\n  - operator: \"==\"\n    threshold: 50.00 USD\n    cost: 4.95 USD\n";

        let result: Result<DeliveryFixture, _> = serde_norway::from_str(yaml);

        assert!(result.is_err());
    }
}
