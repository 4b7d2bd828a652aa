//! Product Catalog

use std::fmt::Debug;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::warn;

use crate::products::Product;

/// Errors raised by catalog lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No product is registered under the code.
    #[error("product not found: {0}")]
    ProductNotFound(String),
}

/// Resolves product codes to catalog records.
pub trait ProductCatalog<'a>: Debug {
    /// Look up a product by its code.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if the code is not registered.
    fn product(&self, code: &str) -> Result<&Product<'a>, CatalogError>;
}

/// Catalog backed by an in-memory map of code to product.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog<'a> {
    products: FxHashMap<String, Product<'a>>,
}

impl<'a> InMemoryCatalog<'a> {
    /// Create a catalog from a list of products.
    ///
    /// If two products share a code, the later one replaces the earlier one.
    pub fn new(products: impl IntoIterator<Item = Product<'a>>) -> Self {
        let mut catalog = Self::default();

        for product in products {
            catalog.insert(product);
        }

        catalog
    }

    /// Register a product, replacing any existing product with the same code.
    pub fn insert(&mut self, product: Product<'a>) {
        if let Some(previous) = self.products.insert(product.code().to_string(), product) {
            warn!(code = previous.code(), "replaced product with duplicate code");
        }
    }

    /// Number of registered products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl<'a> ProductCatalog<'a> for InMemoryCatalog<'a> {
    fn product(&self, code: &str) -> Result<&Product<'a>, CatalogError> {
        self.products
            .get(code)
            .ok_or_else(|| CatalogError::ProductNotFound(code.to_string()))
    }
}
