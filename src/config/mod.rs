//! # Service Configuration
//!
//! Process configuration read from the environment, after loading a `.env`
//! file when one is present.
//!
//! | Variable | Required | Default |
//! |---|---|---|
//! | `GEMINI_API_KEY` | yes | |
//! | `GEMINI_MODEL` | no | `gemini-1.5-flash-latest` |
//! | `GEMINI_API_BASE` | no | `https://generativelanguage.googleapis.com` |
//! | `CATALOG_PATH` | no | `ecommerce_mock_data_200.json` |
//! | `FIREBASE_PROJECT_ID` | no | token verification disabled |
//! | `FIREBASE_JWKS_URL` | no | provider's published key set |

mod errors;

use std::path::PathBuf;

pub use errors::{ConfigError, ConfigResult};

use crate::assistant::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::auth::DEFAULT_JWKS_URL;

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_MODEL: &str = "GEMINI_MODEL";
pub const ENV_API_BASE: &str = "GEMINI_API_BASE";
pub const ENV_CATALOG_PATH: &str = "CATALOG_PATH";
pub const ENV_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
pub const ENV_JWKS_URL: &str = "FIREBASE_JWKS_URL";

pub const DEFAULT_CATALOG_PATH: &str = "ecommerce_mock_data_200.json";

/// Token verification settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub project_id: String,
    pub jwks_url: String,
}

/// Process configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub gemini: GeminiConfig,
    pub catalog_path: PathBuf,
    /// None disables token verification
    pub identity: Option<IdentityConfig>,
}

impl ServiceConfig {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> ConfigResult<Self> {
        // A missing .env file is normal in deployed environments
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(ENV_API_KEY).ok_or(ConfigError::MissingApiKey(ENV_API_KEY))?;

        let base_url = get(ENV_API_BASE).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                name: ENV_API_BASE,
                reason: format!("'{}' is not an http(s) URL", base_url),
            });
        }

        let gemini = GeminiConfig::new(api_key)
            .with_model(get(ENV_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()))
            .with_base_url(base_url);

        let catalog_path =
            PathBuf::from(get(ENV_CATALOG_PATH).unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string()));

        let identity = get(ENV_PROJECT_ID).map(|project_id| IdentityConfig {
            project_id,
            jwks_url: get(ENV_JWKS_URL).unwrap_or_else(|| DEFAULT_JWKS_URL.to_string()),
        });

        Ok(Self {
            gemini,
            catalog_path,
            identity,
        })
    }
}
