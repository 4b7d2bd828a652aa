//! Integration tests for loading checkout configuration from YAML fixture sets.

use std::{fs, path::Path};

use rusty_money::iso::{GBP, USD};
use tempfile::TempDir;
use testresult::TestResult;

use checkout::{fixtures::Fixture, prelude::*};

fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
    let dir = base.join(category);

    fs::create_dir_all(&dir)?;
    fs::write(dir.join(format!("{name}.yml")), contents)?;

    Ok(())
}

fn write_set(base: &Path, name: &str, products: &str, discounts: &str, delivery: &str) -> TestResult {
    write_fixture(base, "products", name, products)?;
    write_fixture(base, "discounts", name, discounts)?;
    write_fixture(base, "delivery", name, delivery)?;

    Ok(())
}

const PRODUCTS: &str = "products:
  A01:
    name: Apple
    price: 1.00 GBP
  P01:
    name: Pear
    price: 0.80 GBP
";

const DISCOUNTS: &str = "discounts:
  - type: quantity
    id: APPLE-PEAR
    triggering_code: A01
    affected_code: P01
    percentage: 25
    required_quantity: 1
    apply_to_quantity: 1
  - type: quantity
    id: PEAR-PAIR
    triggering_code: P01
    affected_code: P01
    percentage: 50
    required_quantity: 2
    apply_to_quantity: 1
";

const DELIVERY: &str = "delivery:
  - operator: \"<\"
    threshold: 2.00 GBP
    cost: 0.50 GBP
  - operator: \">=\"
    threshold: 0.00 GBP
    cost: 0.00 GBP
";

#[test]
fn fixture_set_builds_a_working_basket() -> TestResult {
    let dir = TempDir::new()?;

    write_set(dir.path(), "orchard", PRODUCTS, DISCOUNTS, DELIVERY)?;

    let fixture = Fixture::from_set_in(dir.path(), "orchard")?;

    assert_eq!(fixture.currency()?, GBP);
    assert_eq!(fixture.discounts().len(), 2);

    let mut basket = fixture.basket()?;

    basket.add_product("A01")?;
    basket.add_product("P01")?;

    // The pear is priced at 25% (20p); a £1.20 subtotal falls in the 50p delivery tier.
    assert_eq!(basket.subtotal()?.to_minor_units(), 120);
    assert_eq!(basket.total()?.to_minor_units(), 170);

    Ok(())
}

#[test]
fn discount_file_order_sets_priority() -> TestResult {
    let dir = TempDir::new()?;

    write_set(dir.path(), "orchard", PRODUCTS, DISCOUNTS, DELIVERY)?;

    let fixture = Fixture::from_set_in(dir.path(), "orchard")?;
    let ids: Vec<&str> = fixture.discounts().iter().map(|d| d.id()).collect();

    assert_eq!(ids, vec!["APPLE-PEAR", "PEAR-PAIR"]);

    Ok(())
}

#[test]
fn mixed_currencies_are_rejected() -> TestResult {
    let dir = TempDir::new()?;

    let delivery = "delivery:
  - operator: \">=\"
    threshold: 0.00 USD
    cost: 0.00 USD
";

    write_set(dir.path(), "mixed", PRODUCTS, "discounts: []\n", delivery)?;

    let result = Fixture::from_set_in(dir.path(), "mixed");

    assert!(matches!(
        result,
        Err(FixtureError::CurrencyMismatch(expected, found)) if expected == "GBP" && found == "USD"
    ));

    Ok(())
}

#[test]
fn invalid_discount_reports_the_rule() -> TestResult {
    let dir = TempDir::new()?;

    let discounts = "discounts:
  - type: quantity
    id: BROKEN
    triggering_code: A01
    affected_code: P01
    percentage: 120
    required_quantity: 1
    apply_to_quantity: 1
";

    write_set(dir.path(), "broken", PRODUCTS, discounts, DELIVERY)?;

    let result = Fixture::from_set_in(dir.path(), "broken");

    assert!(matches!(
        result,
        Err(FixtureError::Discount(DiscountError::InvalidPercentage(id, 120))) if id == "BROKEN"
    ));

    Ok(())
}

#[test]
fn malformed_yaml_is_a_parse_error() -> TestResult {
    let dir = TempDir::new()?;

    write_fixture(dir.path(), "products", "bad", "products: [not, a, map\n")?;

    let mut fixture = Fixture::with_base_path(dir.path());

    assert!(matches!(
        fixture.load_products("bad"),
        Err(FixtureError::Yaml(_))
    ));

    Ok(())
}

#[test]
fn bundled_widget_set_loads() -> TestResult {
    let fixture = Fixture::from_set("widgets")?;

    assert_eq!(fixture.currency()?, USD);
    assert_eq!(fixture.catalog().len(), 3);
    assert_eq!(fixture.delivery().criteria().len(), 3);

    Ok(())
}
