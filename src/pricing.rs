//! Prices

use rusty_money::{Money, MoneyError, iso::Currency};

use crate::items::LineItem;

/// Sum of the prices customers pay for the items, in the given currency.
///
/// # Errors
///
/// Returns a [`MoneyError`] if an item is priced in another currency.
pub fn effective_total<'a>(
    items: &[LineItem<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, MoneyError> {
    items
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, item| {
            acc.add(item.effective_price())
        })
}

/// Sum of the catalog prices of the items, ignoring discounts.
///
/// # Errors
///
/// Returns a [`MoneyError`] if an item is priced in another currency.
pub fn original_total<'a>(
    items: &[LineItem<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, MoneyError> {
    items
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, item| {
            acc.add(*item.original_price())
        })
}
