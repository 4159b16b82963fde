//! # Catalog Module
//!
//! Product records and the immutable in-memory catalog they live in.

mod errors;
mod product;
mod store;

pub use errors::{CatalogError, CatalogResult};
pub use product::{Product, ProductId};
pub use store::Catalog;
