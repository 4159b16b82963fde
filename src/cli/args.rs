//! CLI argument definitions using clap
//!
//! Commands:
//! - storefront serve [--host H] [--port P] [--catalog PATH] [--cors-origin O]...
//! - storefront query [--catalog PATH] [filters...]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Storefront - product catalog search and shopping assistant backend
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to bind to
        #[arg(long, default_value_t = 5000)]
        port: u16,

        /// Catalog file (overrides CATALOG_PATH)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Allowed CORS origin, repeatable. None allows any origin.
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,
    },

    /// Evaluate one product query against the catalog and print the matches
    Query {
        /// Catalog file (overrides CATALOG_PATH)
        #[arg(long)]
        catalog: Option<PathBuf>,

        #[command(flatten)]
        filters: QueryFilters,
    },
}

/// Filter flags, named after the HTTP query parameters
#[derive(Args, Debug, Default)]
pub struct QueryFilters {
    /// Free-text search over name, description, brand and category
    #[arg(long)]
    pub q: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub gender: Option<String>,

    #[arg(long)]
    pub brand: Option<String>,

    #[arg(long)]
    pub min_price: Option<String>,

    #[arg(long)]
    pub max_price: Option<String>,

    #[arg(long)]
    pub min_rating: Option<String>,

    /// Size, repeatable; matches products offering any of them
    #[arg(long = "size")]
    pub sizes: Vec<String>,

    /// Color, repeatable; matches products offered in any of them
    #[arg(long = "color")]
    pub colors: Vec<String>,
}

impl QueryFilters {
    /// Flatten into request-style `(key, value)` pairs
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        use crate::query::keys;

        let scalars = [
            (keys::TEXT, &self.q),
            (keys::CATEGORY, &self.category),
            (keys::GENDER, &self.gender),
            (keys::BRAND, &self.brand),
            (keys::MIN_PRICE, &self.min_price),
            (keys::MAX_PRICE, &self.max_price),
            (keys::MIN_RATING, &self.min_rating),
        ];

        let mut pairs: Vec<(&'static str, String)> = scalars
            .into_iter()
            .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
            .collect();
        pairs.extend(self.sizes.iter().map(|s| (keys::SIZES, s.clone())));
        pairs.extend(self.colors.iter().map(|c| (keys::COLORS, c.clone())));
        pairs
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
