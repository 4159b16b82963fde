//! Catalog store
//!
//! Holds the ordered product sequence read once at startup. The store is
//! immutable after construction and shared by reference across requests.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use super::errors::{CatalogError, CatalogResult};
use super::product::Product;
use crate::observability::{log_event_with_fields, Event};

/// Immutable, cheaply clonable product catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Arc<[Product]>,
}

impl Catalog {
    /// Create a catalog from already-parsed records, keeping their order
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into(),
        }
    }

    /// Create an empty catalog
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the catalog from a JSON file, degrading to empty on any failure.
    ///
    /// A missing or malformed file is logged as a warning and never stops the
    /// service. Parsing is strict per record: a single record with a wrongly
    /// typed attribute (`"price": "49.99"`, `"sizes": "M"`) makes the whole
    /// file malformed.
    pub fn load(path: &Path) -> Self {
        let path_str = path.display().to_string();

        match Self::try_load(path) {
            Ok(catalog) => {
                let count = catalog.len().to_string();
                log_event_with_fields(
                    Event::CatalogLoaded,
                    &[("path", &path_str), ("count", &count)],
                );
                catalog
            }
            Err(e) => {
                let detail = e.to_string();
                log_event_with_fields(
                    Event::CatalogLoadFailed,
                    &[("path", &path_str), ("reason", e.reason()), ("detail", &detail)],
                );
                Self::empty()
            }
        }
    }

    /// Load the catalog from a JSON file, reporting failures
    pub fn try_load(path: &Path) -> CatalogResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            let path = path.display().to_string();
            if e.kind() == io::ErrorKind::NotFound {
                CatalogError::NotFound(path)
            } else {
                CatalogError::Unreadable { path, source: e }
            }
        })?;

        Self::from_json_str(&content)
    }

    /// Parse a catalog from a JSON array of product objects
    pub fn from_json_str(content: &str) -> CatalogResult<Self> {
        let products: Vec<Product> = serde_json::from_str(content)?;
        Ok(Self::new(products))
    }

    /// Products in catalog order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
