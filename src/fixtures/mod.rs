//! Fixtures
//!
//! Checkout configuration loaded from YAML files laid out as
//! `<base>/{products,discounts,delivery}/<set>.yml`.

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

use crate::{
    basket::Basket,
    delivery::{ChargeCriterion, DeliveryChargeResolver, DeliveryError},
    discounts::{DiscountError, applicator::DiscountApplicator},
    fixtures::{
        delivery::DeliveryFixture,
        discounts::DiscountsFixture,
        products::{ProductsFixture, parse_price},
    },
    products::{
        Product, ProductError,
        catalog::{InMemoryCatalog, ProductCatalog},
    },
};

pub mod delivery;
pub mod discounts;
pub mod products;

/// Directory searched when no base path is given
pub const DEFAULT_BASE_PATH: &str = "./fixtures";

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Currency mismatch between prices in the set
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No prices loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Invalid product definition
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Invalid discount definition
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Invalid delivery tier definition
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    catalog: InMemoryCatalog<'a>,
    discounts: DiscountApplicator,
    delivery: DeliveryChargeResolver<'a>,

    /// Currency shared by every price in the set
    currency: Option<&'static Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path(DEFAULT_BASE_PATH)
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: InMemoryCatalog::default(),
            discounts: DiscountApplicator::default(),
            delivery: DeliveryChargeResolver::default(),
            currency: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = self.read("products", name)?;
        let count = fixture.products.len();

        for (code, product_fixture) in fixture.products {
            let (_minor_units, currency) = parse_price(&product_fixture.price)?;

            self.track_currency(currency)?;
            self.catalog.insert(product_fixture.into_product(&code)?);
        }

        info!(set = name, count, "loaded products");

        Ok(self)
    }

    /// Load discounts from a YAML fixture file, appending them in file order
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or a discount is invalid.
    pub fn load_discounts(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: DiscountsFixture = self.read("discounts", name)?;
        let count = fixture.discounts.len();

        for discount_fixture in fixture.discounts {
            self.discounts.push_boxed(discount_fixture.try_into_discount()?);
        }

        info!(set = name, count, "loaded discounts");

        Ok(self)
    }

    /// Load delivery tiers from a YAML fixture file, replacing any loaded before
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, a tier is invalid, or
    /// if there are currency mismatches.
    pub fn load_delivery(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: DeliveryFixture = self.read("delivery", name)?;
        let mut criteria = Vec::with_capacity(fixture.delivery.len());

        for criterion_fixture in fixture.delivery {
            let (_minor_units, threshold_currency) = parse_price(&criterion_fixture.threshold)?;
            let (_minor_units, cost_currency) = parse_price(&criterion_fixture.cost)?;

            self.track_currency(threshold_currency)?;
            self.track_currency(cost_currency)?;

            criteria.push(ChargeCriterion::try_from(criterion_fixture)?);
        }

        info!(set = name, count = criteria.len(), "loaded delivery tiers");

        self.delivery = DeliveryChargeResolver::new(criteria);

        Ok(self)
    }

    /// Load a complete fixture set (products, discounts and delivery with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in(DEFAULT_BASE_PATH, name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_products(name)?
            .load_discounts(name)?
            .load_delivery(name)?;

        Ok(fixture)
    }

    /// Get a product by its code
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, code: &str) -> Result<&Product<'a>, FixtureError> {
        self.catalog
            .product(code)
            .map_err(|_err| FixtureError::ProductNotFound(code.to_string()))
    }

    /// The loaded catalog
    pub fn catalog(&self) -> &InMemoryCatalog<'a> {
        &self.catalog
    }

    /// The loaded discounts, in priority order
    pub fn discounts(&self) -> &DiscountApplicator {
        &self.discounts
    }

    /// The loaded delivery tiers
    pub fn delivery(&self) -> &DeliveryChargeResolver<'a> {
        &self.delivery
    }

    /// Create an empty basket wired to the loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no prices have been loaded yet.
    pub fn basket(&'a self) -> Result<Basket<'a>, FixtureError> {
        let currency = self.currency()?;

        Ok(Basket::new(
            &self.catalog,
            &self.discounts,
            &self.delivery,
            currency,
        ))
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no prices have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    fn read<T: DeserializeOwned>(&self, category: &str, name: &str) -> Result<T, FixtureError> {
        let file_path = self.base_path.join(category).join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }

    fn track_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);

                Ok(())
            }
        }
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
