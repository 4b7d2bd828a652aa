//! Receipt

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows, Segment},
        style::BorderColor,
    },
};
use thiserror::Error;

use crate::{
    basket::{Basket, BasketError},
    items::{DiscountMark, LineItem, LineItemId},
};

/// Errors that can occur when building a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating basket totals.
    #[error(transparent)]
    Basket(#[from] BasketError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Snapshot of a single basket line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine<'a> {
    id: LineItemId,
    code: String,
    name: String,
    original_price: Money<'a, Currency>,
    price: Money<'a, Currency>,
    discount_id: Option<String>,
}

impl<'a> ReceiptLine<'a> {
    fn from_item(item: &LineItem<'a>) -> Self {
        Self {
            id: item.id(),
            code: item.code().to_string(),
            name: item.name().to_string(),
            original_price: *item.original_price(),
            price: item.effective_price(),
            discount_id: item
                .discount()
                .map(DiscountMark::discount_id)
                .map(str::to_string),
        }
    }

    /// Identity of the basket line
    pub fn id(&self) -> LineItemId {
        self.id
    }

    /// Product code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Catalog price
    pub fn original_price(&self) -> Money<'a, Currency> {
        self.original_price
    }

    /// Price paid
    pub fn price(&self) -> Money<'a, Currency> {
        self.price
    }

    /// Discount that claimed the line, if any
    pub fn discount_id(&self) -> Option<&str> {
        self.discount_id.as_deref()
    }
}

/// Final receipt for a basket.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    /// Basket lines in insertion order
    lines: SmallVec<[ReceiptLine<'a>; 10]>,

    /// Total cost before any discounts
    subtotal: Money<'a, Currency>,

    /// Total cost of the items after discounts, before delivery
    discounted_subtotal: Money<'a, Currency>,

    /// Delivery cost for the discounted subtotal
    delivery: Money<'a, Currency>,

    /// Amount payable
    total: Money<'a, Currency>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from the current state of a basket.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the basket totals cannot be calculated.
    pub fn from_basket(basket: &Basket<'a>) -> Result<Self, ReceiptError> {
        let discounted_subtotal = basket.subtotal()?;
        let delivery = basket.delivery_charge()?;

        Ok(Receipt {
            lines: basket.iter().map(ReceiptLine::from_item).collect(),
            subtotal: basket.original_subtotal()?,
            discounted_subtotal,
            delivery,
            total: discounted_subtotal.add(delivery)?,
            currency: basket.currency(),
        })
    }

    /// Basket lines in insertion order
    #[must_use]
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Total cost before any discounts
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total cost of the items after discounts
    #[must_use]
    pub fn discounted_subtotal(&self) -> Money<'a, Currency> {
        self.discounted_subtotal
    }

    /// Delivery cost
    #[must_use]
    pub fn delivery(&self) -> Money<'a, Currency> {
        self.delivery
    }

    /// Amount payable, including delivery
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Calculate the savings made by applying discounts.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.discounted_subtotal)
    }

    /// Calculates the savings made by applying the discounts as a percentage
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings_minor = self.savings()?.to_minor_units();
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Ok(Percentage::from(0.0));
        }

        let savings_dec = Decimal::from_i64(savings_minor).unwrap_or(Decimal::ZERO);
        let subtotal_dec = Decimal::from_i64(subtotal_minor).unwrap_or(Decimal::ZERO);

        Ok(Percentage::from(savings_dec / subtotal_dec))
    }

    /// Prints the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record([
            "",
            "Item",
            "Code",
            "Base Price",
            "Discounted Price",
            "Savings",
            "Discount",
        ]);

        let mut color_ops: SmallVec<[(usize, usize, Color); 32]> = SmallVec::new();

        for (idx, line) in self.lines.iter().enumerate() {
            let row = idx + 1; // header is row 0

            builder.push_record(line_cells(idx, line)?);

            color_ops.push((row, 2, Color::FG_BRIGHT_BLACK));

            if line.price != line.original_price {
                color_ops.push((row, 4, Color::FG_GREEN));
            }
        }

        write_receipt_table(&mut out, builder, self.lines.len(), color_ops)?;

        write_receipt_summary(&mut out, self)
    }
}

fn line_cells(idx: usize, line: &ReceiptLine<'_>) -> Result<[String; 7], ReceiptError> {
    let (final_price, savings) = if line.price == line.original_price {
        (String::new(), String::new())
    } else {
        let savings = line.original_price.sub(line.price)?;
        let percent = Percentage::from(
            Decimal::from_i64(savings.to_minor_units()).unwrap_or(Decimal::ZERO)
                / Decimal::from_i64(line.original_price.to_minor_units()).unwrap_or(Decimal::ONE),
        );

        (
            format!("{}", line.price),
            format!(
                "({}%) -{savings}",
                percent_points_from_fractional_percentage(percent)
            ),
        )
    };

    Ok([
        format!("#{:<3}", idx + 1),
        line.name.clone(),
        line.code.clone(),
        format!("{}", line.original_price),
        final_price,
        savings,
        line.discount_id.clone().unwrap_or_default(),
    ])
}

fn write_receipt_table(
    out: &mut impl io::Write,
    builder: Builder,
    line_count: usize,
    color_ops: SmallVec<[(usize, usize, Color); 32]>,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();

    if line_count > 0 {
        theme.insert_horizontal_line(1, separator);
    }

    table.with(theme);
    table.modify(Segment::all(), BorderColor::filled(Color::FG_BRIGHT_BLACK));
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    receipt: &Receipt<'_>,
) -> Result<(), ReceiptError> {
    let savings = receipt.savings()?;
    let savings_points = percent_points_from_fractional_percentage(receipt.savings_percent()?);

    let mut lines = summary_lines(&[
        ("Subtotal:", receipt.subtotal().to_string()),
        ("Savings:", format!("({savings_points:.2}%) {savings}")),
        ("Delivery:", receipt.delivery().to_string()),
        ("Total:", receipt.total().to_string()),
    ]);

    if let Some(total) = lines.last_mut() {
        *total = Color::BOLD.colorize(total.as_str());
    }

    for line in lines {
        writeln!(out, "{line}").map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Right-aligns labels and values into two columns.
fn summary_lines(rows: &[(&str, String)]) -> Vec<String> {
    let label_width = rows
        .iter()
        .map(|(label, _value)| label.chars().count())
        .max()
        .unwrap_or_default();

    let value_width = rows
        .iter()
        .map(|(_label, value)| value.chars().count())
        .max()
        .unwrap_or_default();

    rows.iter()
        .map(|(label, value)| format!(" {label:>label_width$}  {value:>value_width$}  "))
        .collect()
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}
