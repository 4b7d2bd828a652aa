//! Discount Applicator
//!
//! Partitions line items among the configured discounts, in configuration order, and
//! materialises the discounted items.

use std::slice;

use tracing::trace;

use crate::{
    discounts::{Discount, DiscountError},
    items::{LineItem, identity::difference_by_identity},
};

/// A discount together with the items it claimed.
#[derive(Debug, Clone)]
pub struct DiscountAllocation<'d, 'a> {
    discount: &'d dyn Discount,
    items: Vec<LineItem<'a>>,
}

impl<'d, 'a> DiscountAllocation<'d, 'a> {
    /// The discount that claimed the items
    pub fn discount(&self) -> &'d dyn Discount {
        self.discount
    }

    /// The claimed items, before the discount is applied
    pub fn items(&self) -> &[LineItem<'a>] {
        &self.items
    }

    /// Apply the discount to the claimed items.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if the discount rejects the items.
    pub fn apply(&self) -> Result<Vec<LineItem<'a>>, DiscountError> {
        self.discount.apply(&self.items)
    }
}

/// Ordered set of discount rules. Earlier rules take priority.
#[derive(Debug, Default)]
pub struct DiscountApplicator {
    discounts: Vec<Box<dyn Discount>>,
}

impl DiscountApplicator {
    /// Create an applicator from discounts in priority order.
    pub fn new(discounts: Vec<Box<dyn Discount>>) -> Self {
        Self { discounts }
    }

    /// Append a discount with the lowest priority so far.
    pub fn push(&mut self, discount: impl Discount + 'static) {
        self.discounts.push(Box::new(discount));
    }

    /// Append an already boxed discount with the lowest priority so far.
    pub fn push_boxed(&mut self, discount: Box<dyn Discount>) {
        self.discounts.push(discount);
    }

    /// Iterate over the discounts in priority order.
    pub fn iter(&self) -> slice::Iter<'_, Box<dyn Discount>> {
        self.discounts.iter()
    }

    /// Number of configured discounts.
    pub fn len(&self) -> usize {
        self.discounts.len()
    }

    /// Whether no discounts are configured.
    pub fn is_empty(&self) -> bool {
        self.discounts.is_empty()
    }

    /// Assign items to discounts.
    ///
    /// For each item, the first discount that can be triggered by its code and claims a
    /// non-empty set from the whole of `items` wins; the items it leaves unclaimed are
    /// distributed recursively.
    ///
    /// The scan always runs against `items`, not a list shrunk by earlier claims, so
    /// several items sharing a triggering code append the same allocation more than once.
    /// Applying an allocation twice yields the same annotations, and the basket merges
    /// results by identity, so the repeats are harmless.
    ///
    /// For the same reason two different rules may claim the same affected item when
    /// each is triggered by a different item. The claim appended last wins the merge.
    pub fn distribute<'a>(&self, items: &[LineItem<'a>]) -> Vec<DiscountAllocation<'_, 'a>> {
        let mut allocations = Vec::new();

        for item in items {
            let Some((discount, affected)) = self.first_claim(item, items) else {
                continue;
            };

            let unaffected = difference_by_identity(items, &affected);

            trace!(
                discount = discount.id(),
                trigger = item.code(),
                claimed = affected.len(),
                remaining = unaffected.len(),
                "allocated items to discount"
            );

            allocations.push(DiscountAllocation {
                discount,
                items: affected,
            });

            allocations.extend(self.distribute(&unaffected));
        }

        allocations
    }

    /// Apply every allocation and concatenate the results.
    ///
    /// Repeated allocations produce repeated items; callers merge by identity.
    ///
    /// # Errors
    ///
    /// Returns the first [`DiscountError`] raised by a discount.
    pub fn apply_all<'a>(
        &self,
        allocations: &[DiscountAllocation<'_, 'a>],
    ) -> Result<Vec<LineItem<'a>>, DiscountError> {
        let mut applied = Vec::new();

        for allocation in allocations {
            applied.extend(allocation.apply()?);
        }

        Ok(applied)
    }

    fn first_claim<'a>(
        &self,
        item: &LineItem<'a>,
        items: &[LineItem<'a>],
    ) -> Option<(&dyn Discount, Vec<LineItem<'a>>)> {
        self.discounts
            .iter()
            .filter(|discount| discount.can_trigger(item.code()))
            .find_map(|discount| {
                let affected = discount.determine_affected_items(items);

                (!affected.is_empty()).then_some((discount.as_ref(), affected))
            })
    }
}
