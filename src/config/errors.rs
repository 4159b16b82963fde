//! Configuration errors
//!
//! All configuration errors are FATAL: the service refuses to start.

use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Completion provider credential not set
    #[error("{0} environment variable not set. Please create a .env file.")]
    MissingApiKey(&'static str),

    /// A variable is set but unusable
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}
