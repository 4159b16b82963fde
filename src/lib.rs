//! storefront - Product catalog search and shopping assistant backend
//!
//! The core is the product query engine (`query`) evaluated over an
//! immutable in-memory catalog (`catalog`). The assistant and identity
//! capabilities are thin adapters around external providers.

pub mod assistant;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod observability;
pub mod query;
