//! CLI module for storefront
//!
//! Provides command-line interface for:
//! - serve: Boot the service and serve the HTTP API
//! - query: One-shot product query against a catalog file

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, QueryFilters};
pub use commands::{query, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
