//! # Catalog Errors
//!
//! Error types for loading the product catalog.

use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog loading errors
///
/// None of these are fatal to the service: `Catalog::load` degrades to an
/// empty catalog and logs the error instead.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file does not exist
    #[error("Catalog file not found: {0}")]
    NotFound(String),

    /// Catalog file exists but could not be read
    #[error("Failed to read catalog file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not a JSON array of products
    #[error("Malformed catalog JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl CatalogError {
    /// Short machine-readable reason for log fields
    pub fn reason(&self) -> &'static str {
        match self {
            CatalogError::NotFound(_) => "not_found",
            CatalogError::Unreadable { .. } => "unreadable",
            CatalogError::Malformed(_) => "malformed",
        }
    }
}
