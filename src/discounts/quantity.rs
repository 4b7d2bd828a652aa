//! Quantity Discount
//!
//! "Buy N of one product, get M of another (or the same) at a percentage of the price."

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};

use crate::{
    discounts::{Discount, DiscountError, percent_of_minor, percentage_from_points},
    items::{
        LineItem,
        identity::{merge_by_identity, select_by_code},
    },
};

/// A percentage discount triggered by a quantity of one product.
///
/// Once `required_quantity` items with the triggering code are present, the first
/// `apply_to_quantity` items with the affected code are priced at `percentage` percent
/// of their original price, truncated to the minor unit.
#[derive(Debug, Clone)]
pub struct QuantityDiscount {
    id: String,
    triggering_code: String,
    affected_code: String,
    percentage: u8,
    percent: Percentage,
    required_quantity: usize,
    apply_to_quantity: usize,
}

impl QuantityDiscount {
    /// Create a new quantity discount.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if the id or either code is empty, the percentage is
    /// outside `1..=100`, or either quantity is zero.
    pub fn new(
        id: impl Into<String>,
        triggering_code: impl Into<String>,
        affected_code: impl Into<String>,
        percentage: u8,
        required_quantity: usize,
        apply_to_quantity: usize,
    ) -> Result<Self, DiscountError> {
        let id = id.into();
        let triggering_code = triggering_code.into();
        let affected_code = affected_code.into();

        if id.is_empty() {
            return Err(DiscountError::EmptyId);
        }

        if triggering_code.is_empty() {
            return Err(DiscountError::EmptyTriggeringCode(id));
        }

        if affected_code.is_empty() {
            return Err(DiscountError::EmptyAffectedCode(id));
        }

        if percentage == 0 || percentage > 100 {
            return Err(DiscountError::InvalidPercentage(id, percentage));
        }

        if required_quantity == 0 {
            return Err(DiscountError::InvalidRequiredQuantity(id));
        }

        if apply_to_quantity == 0 {
            return Err(DiscountError::InvalidApplyToQuantity(id));
        }

        Ok(Self {
            id,
            triggering_code,
            affected_code,
            percentage,
            percent: percentage_from_points(percentage),
            required_quantity,
            apply_to_quantity,
        })
    }

    /// Code of the product that activates the discount
    pub fn triggering_code(&self) -> &str {
        &self.triggering_code
    }

    /// Code of the product whose price is reduced
    pub fn affected_code(&self) -> &str {
        &self.affected_code
    }

    /// Percentage of the original price charged for affected items
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    /// Number of triggering items needed
    pub fn required_quantity(&self) -> usize {
        self.required_quantity
    }

    /// Number of affected items discounted
    pub fn apply_to_quantity(&self) -> usize {
        self.apply_to_quantity
    }

    /// The first `required_quantity` triggering items, or nothing if there are fewer.
    pub fn select_triggering_items<'a>(&self, items: &[LineItem<'a>]) -> Vec<LineItem<'a>> {
        let mut triggering = select_by_code(items, &self.triggering_code);

        if triggering.len() < self.required_quantity {
            return Vec::new();
        }

        triggering.truncate(self.required_quantity);

        triggering
    }

    /// The first `apply_to_quantity` affected items.
    pub fn select_discounted_items<'a>(&self, items: &[LineItem<'a>]) -> Vec<LineItem<'a>> {
        let mut discounted = select_by_code(items, &self.affected_code);

        discounted.truncate(self.apply_to_quantity);

        discounted
    }

    /// Price of an affected item after the discount, truncated to the minor unit.
    ///
    /// The result is not checked against the original; a 100% rule or a free product
    /// yields a price that [`LineItem::with_discount`] rejects.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
    pub fn discounted_price<'a>(
        &self,
        original: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        let discounted_minor = percent_of_minor(&self.percent, original.to_minor_units())?;

        Ok(Money::from_minor(discounted_minor, original.currency()))
    }

    fn ensure_claimable(&self, items: &[LineItem<'_>]) -> Result<(), DiscountError> {
        match items
            .iter()
            .find(|item| item.code() != self.triggering_code && item.code() != self.affected_code)
        {
            Some(item) => Err(DiscountError::IncompatibleItem {
                discount: self.id.clone(),
                code: item.code().to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl Discount for QuantityDiscount {
    fn id(&self) -> &str {
        &self.id
    }

    fn can_trigger(&self, code: &str) -> bool {
        code == self.triggering_code
    }

    fn determine_affected_items<'a>(&self, items: &[LineItem<'a>]) -> Vec<LineItem<'a>> {
        let triggering = self.select_triggering_items(items);

        if triggering.len() < self.required_quantity {
            return Vec::new();
        }

        let discounted = self.select_discounted_items(items);

        if discounted.is_empty() {
            return Vec::new();
        }

        merge_by_identity([triggering.as_slice(), discounted.as_slice()])
    }

    fn apply<'a>(&self, items: &[LineItem<'a>]) -> Result<Vec<LineItem<'a>>, DiscountError> {
        self.ensure_claimable(items)?;

        let triggering = self.select_triggering_items(items);

        if triggering.is_empty() {
            return Ok(Vec::new());
        }

        let participating = triggering
            .iter()
            .map(|item| item.with_discount(self.id.as_str(), None))
            .collect::<Result<Vec<_>, _>>()?;

        let discounted = self
            .select_discounted_items(items)
            .iter()
            .map(|item| {
                let price = self.discounted_price(item.original_price())?;

                item.with_discount(self.id.as_str(), Some(price))
                    .map_err(DiscountError::from)
            })
            .collect::<Result<Vec<_>, DiscountError>>()?;

        // Priced entries come last so they win when an item both triggers and is discounted.
        Ok(merge_by_identity([
            participating.as_slice(),
            discounted.as_slice(),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{
        items::{DiscountMark, LineItemError, LineItemId},
        products::Product,
    };

    use super::*;

    fn item<'a>(code: &str, price: i64) -> Result<LineItem<'a>, crate::products::ProductError> {
        let product = Product::new(code, Money::from_minor(price, USD), code)?;

        Ok(LineItem::from_product(&product, LineItemId::generate()))
    }

    fn ids(items: &[LineItem<'_>]) -> Vec<LineItemId> {
        items.iter().map(LineItem::id).collect()
    }

    fn half_price_second_red() -> Result<QuantityDiscount, DiscountError> {
        QuantityDiscount::new("DQ-01", "R01", "R01", 50, 2, 1)
    }

    #[test]
    fn new_rejects_invalid_configuration() {
        assert_eq!(
            QuantityDiscount::new("", "R01", "R01", 50, 2, 1).err(),
            Some(DiscountError::EmptyId)
        );
        assert_eq!(
            QuantityDiscount::new("D", "", "R01", 50, 2, 1).err(),
            Some(DiscountError::EmptyTriggeringCode("D".to_string()))
        );
        assert_eq!(
            QuantityDiscount::new("D", "R01", "", 50, 2, 1).err(),
            Some(DiscountError::EmptyAffectedCode("D".to_string()))
        );
        assert_eq!(
            QuantityDiscount::new("D", "R01", "R01", 0, 2, 1).err(),
            Some(DiscountError::InvalidPercentage("D".to_string(), 0))
        );
        assert_eq!(
            QuantityDiscount::new("D", "R01", "R01", 101, 2, 1).err(),
            Some(DiscountError::InvalidPercentage("D".to_string(), 101))
        );
        assert_eq!(
            QuantityDiscount::new("D", "R01", "R01", 50, 0, 1).err(),
            Some(DiscountError::InvalidRequiredQuantity("D".to_string()))
        );
        assert_eq!(
            QuantityDiscount::new("D", "R01", "R01", 50, 2, 0).err(),
            Some(DiscountError::InvalidApplyToQuantity("D".to_string()))
        );
    }

    #[test]
    fn new_accepts_boundary_percentages() -> TestResult {
        let one = QuantityDiscount::new("D1", "R01", "R01", 1, 1, 1)?;
        let hundred = QuantityDiscount::new("D100", "R01", "R01", 100, 1, 1)?;

        assert_eq!(one.percentage(), 1);
        assert_eq!(hundred.percentage(), 100);

        Ok(())
    }

    #[test]
    fn can_trigger_matches_triggering_code_only() -> TestResult {
        let discount = QuantityDiscount::new("DX", "R01", "G01", 50, 1, 1)?;

        assert!(discount.can_trigger("R01"));
        assert!(!discount.can_trigger("G01"));

        Ok(())
    }

    #[test]
    fn select_triggering_items_needs_required_quantity() -> TestResult {
        let discount = half_price_second_red()?;
        let r1 = item("R01", 3295)?;
        let r2 = item("R01", 3295)?;
        let r3 = item("R01", 3295)?;

        assert!(discount.select_triggering_items(&[r1.clone()]).is_empty());
        assert_eq!(
            ids(&discount.select_triggering_items(&[r1.clone(), r2.clone(), r3])),
            vec![r1.id(), r2.id()]
        );

        Ok(())
    }

    #[test]
    fn select_discounted_items_truncates_to_apply_to_quantity() -> TestResult {
        let discount = QuantityDiscount::new("DX", "R01", "G01", 50, 1, 2)?;
        let g1 = item("G01", 2495)?;
        let g2 = item("G01", 2495)?;
        let g3 = item("G01", 2495)?;

        let selected =
            discount.select_discounted_items(&[g1.clone(), item("R01", 3295)?, g2.clone(), g3]);

        assert_eq!(ids(&selected), vec![g1.id(), g2.id()]);

        Ok(())
    }

    #[test]
    fn determine_affected_items_inactive_without_enough_triggers() -> TestResult {
        let discount = half_price_second_red()?;

        let affected =
            discount.determine_affected_items(&[item("R01", 3295)?, item("G01", 2495)?]);

        assert!(affected.is_empty());

        Ok(())
    }

    #[test]
    fn determine_affected_items_unions_triggering_and_discounted() -> TestResult {
        let discount = half_price_second_red()?;
        let r1 = item("R01", 3295)?;
        let r2 = item("R01", 3295)?;
        let r3 = item("R01", 3295)?;

        let affected = discount.determine_affected_items(&[r1.clone(), r2.clone(), r3]);

        assert_eq!(ids(&affected), vec![r1.id(), r2.id()]);

        Ok(())
    }

    #[test]
    fn determine_affected_items_cross_product() -> TestResult {
        let discount = QuantityDiscount::new("DX", "R01", "G01", 50, 1, 1)?;
        let r1 = item("R01", 3295)?;
        let g1 = item("G01", 2495)?;

        let affected = discount.determine_affected_items(&[g1.clone(), r1.clone()]);

        assert_eq!(ids(&affected), vec![r1.id(), g1.id()]);

        Ok(())
    }

    #[test]
    fn determine_affected_items_empty_when_nothing_to_discount() -> TestResult {
        let discount = QuantityDiscount::new("DX", "R01", "G01", 50, 1, 1)?;

        let affected = discount.determine_affected_items(&[item("R01", 3295)?]);

        assert!(affected.is_empty());

        Ok(())
    }

    #[test]
    fn apply_prices_discounted_items_and_marks_triggers() -> TestResult {
        let discount = half_price_second_red()?;
        let r1 = item("R01", 3295)?;
        let r2 = item("R01", 3295)?;

        let applied = discount.apply(&[r1.clone(), r2.clone()])?;

        assert_eq!(ids(&applied), vec![r1.id(), r2.id()]);

        let prices: Vec<i64> = applied
            .iter()
            .map(|item| item.effective_price().to_minor_units())
            .collect();

        assert_eq!(prices, vec![1647, 3295]);
        assert!(
            applied
                .iter()
                .all(|item| item.discount().map(DiscountMark::discount_id) == Some("DQ-01"))
        );

        Ok(())
    }

    #[test]
    fn apply_cross_product_leaves_trigger_price_alone() -> TestResult {
        let discount = QuantityDiscount::new("DX", "R01", "G01", 20, 1, 1)?;
        let r1 = item("R01", 3295)?;
        let g1 = item("G01", 2495)?;

        let applied = discount.apply(&[r1, g1])?;

        let prices: Vec<i64> = applied
            .iter()
            .map(|item| item.effective_price().to_minor_units())
            .collect();

        // 20% of 2495 = 499
        assert_eq!(prices, vec![3295, 499]);

        Ok(())
    }

    #[test]
    fn apply_rejects_items_it_cannot_claim() -> TestResult {
        let discount = half_price_second_red()?;

        let result = discount.apply(&[item("R01", 3295)?, item("B01", 795)?]);

        assert_eq!(
            result,
            Err(DiscountError::IncompatibleItem {
                discount: "DQ-01".to_string(),
                code: "B01".to_string(),
            })
        );

        Ok(())
    }

    #[test]
    fn apply_without_enough_triggers_returns_nothing() -> TestResult {
        let discount = half_price_second_red()?;

        assert!(discount.apply(&[item("R01", 3295)?])?.is_empty());

        Ok(())
    }

    #[test]
    fn full_percentage_rejects_price_that_is_not_lower() -> TestResult {
        let discount = QuantityDiscount::new("D100", "R01", "R01", 100, 1, 1)?;

        assert_eq!(
            discount.apply(&[item("R01", 3295)?]),
            Err(DiscountError::LineItem(LineItemError::DiscountedPriceNotLower {
                code: "R01".to_string(),
                discounted: 3295,
                original: 3295,
            }))
        );

        Ok(())
    }

    #[test]
    fn free_product_cannot_be_discounted() -> TestResult {
        let discount = half_price_second_red()?;

        let result = discount.apply(&[item("R01", 0)?, item("R01", 0)?]);

        assert!(matches!(
            result,
            Err(DiscountError::LineItem(
                LineItemError::DiscountedPriceNotLower { original: 0, .. }
            ))
        ));

        Ok(())
    }

    #[test]
    fn discounted_price_is_positive_and_lower_for_valid_rules() -> TestResult {
        for percentage in 1..100u8 {
            let discount = QuantityDiscount::new("D", "R01", "R01", percentage, 1, 1)?;

            for original in [1, 99, 795, 2495, 3295] {
                let price = discount.discounted_price(&Money::from_minor(original, USD))?;

                assert!(price.to_minor_units() >= 0);
                assert!(price.to_minor_units() < original);
            }
        }

        Ok(())
    }
}
