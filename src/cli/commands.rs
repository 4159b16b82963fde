//! CLI command implementations
//!
//! `serve` boot sequence:
//! 1. Load configuration (fatal on error)
//! 2. Load the catalog (degrades to empty)
//! 3. Prepare token verification (keys retried lazily if the fetch fails)
//! 4. Build the completion client
//! 5. Serve HTTP until the process is stopped

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assistant::GeminiClient;
use crate::auth::{IdTokenVerifier, TokenVerifier};
use crate::catalog::Catalog;
use crate::config::{IdentityConfig, ServiceConfig, DEFAULT_CATALOG_PATH, ENV_CATALOG_PATH};
use crate::http_server::{AppState, HttpServer, HttpServerConfig};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::query::{parse_query_params, QueryEvaluator};

use super::args::{Command, QueryFilters};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            host,
            port,
            catalog,
            cors_origins,
        } => {
            let http_config = HttpServerConfig::with_port(port)
                .with_host(host)
                .with_cors_origins(cors_origins);
            serve(http_config, catalog)
        }
        Command::Query { catalog, filters } => query(catalog, &filters),
    }
}

/// Boot the service and serve HTTP
pub fn serve(http_config: HttpServerConfig, catalog_override: Option<PathBuf>) -> CliResult<()> {
    log_event(Event::BootStart);

    let mut config = ServiceConfig::from_env().map_err(|e| {
        let detail = e.to_string();
        log_event_with_fields(Event::ConfigInvalid, &[("detail", &detail)]);
        CliError::from(e)
    })?;
    if let Some(path) = catalog_override {
        config.catalog_path = path;
    }

    let catalog_path = config.catalog_path.display().to_string();
    let identity = if config.identity.is_some() { "enabled" } else { "disabled" };
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("model", &config.gemini.model),
            ("catalog_path", &catalog_path),
            ("token_verification", identity),
        ],
    );

    let catalog = Catalog::load(&config.catalog_path);

    let assistant = GeminiClient::new(config.gemini.clone())
        .map_err(|e| CliError::boot_failed(format!("Failed to build completion client: {}", e)))?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let mut state = AppState::new(catalog, Arc::new(assistant));
        if let Some(identity) = &config.identity {
            state = state.with_verifier(prepare_verifier(identity).await);
        }

        HttpServer::with_config(http_config, Arc::new(state))
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Build the token verifier and warm its key cache.
///
/// A failed boot fetch is logged and leaves the cache empty; the verifier
/// fetches again when the next token arrives.
async fn prepare_verifier(identity: &IdentityConfig) -> Arc<dyn TokenVerifier> {
    let verifier = IdTokenVerifier::remote(
        identity.project_id.clone(),
        reqwest::Client::new(),
        identity.jwks_url.clone(),
    );

    match verifier.refresh().await {
        Ok(count) => {
            let keys = count.to_string();
            log_event_with_fields(
                Event::VerifierReady,
                &[("project_id", verifier.project_id()), ("keys", &keys)],
            );
        }
        Err(e) => {
            let reason = e.to_string();
            log_event_with_fields(
                Event::VerifierUnavailable,
                &[("project_id", &identity.project_id), ("reason", &reason)],
            );
        }
    }

    Arc::new(verifier)
}

/// Evaluate one query against the catalog file and print matches as JSON
pub fn query(catalog_override: Option<PathBuf>, filters: &QueryFilters) -> CliResult<()> {
    let path = catalog_override.unwrap_or_else(default_catalog_path);
    let mut stdout = io::stdout();
    run_query(&path, filters, &mut stdout)
}

/// Catalog path from the environment (or `.env`), else the default file name
fn default_catalog_path() -> PathBuf {
    dotenv::dotenv().ok();
    std::env::var(ENV_CATALOG_PATH)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH))
}

fn run_query<W: Write>(path: &Path, filters: &QueryFilters, out: &mut W) -> CliResult<()> {
    // Unlike serving, a one-shot query reports a bad catalog instead of
    // answering from an empty one
    let catalog = Catalog::try_load(path)?;
    let query = parse_query_params(filters.to_pairs());
    let products = QueryEvaluator::evaluate(catalog.products(), &query);

    serde_json::to_writer_pretty(&mut *out, &products)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use tempfile::TempDir;

    fn write_catalog(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("products.json");
        std::fs::write(
            &path,
            r#"[
                {"id": 1, "name": "Red Runner", "category": "shoes", "price": 50, "sizes": ["M"]},
                {"id": 2, "name": "Blue Hat", "category": "hats", "price": 15, "sizes": ["L"]}
            ]"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_run_query_prints_matches() {
        let dir = TempDir::new().unwrap();
        let path = write_catalog(&dir);
        let filters = QueryFilters {
            sizes: vec!["l".to_string(), "xl".to_string()],
            ..Default::default()
        };

        let mut out = Vec::new();
        run_query(&path, &filters, &mut out).unwrap();

        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed.as_array().unwrap().len(), 1);
        assert_eq!(printed[0]["id"], 2);
    }

    #[test]
    fn test_run_query_lenient_numbers() {
        let dir = TempDir::new().unwrap();
        let path = write_catalog(&dir);
        let filters = QueryFilters {
            max_price: Some("cheap".to_string()),
            ..Default::default()
        };

        let mut out = Vec::new();
        run_query(&path, &filters, &mut out).unwrap();

        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_run_query_reports_missing_catalog() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();

        let err = run_query(&dir.path().join("absent.json"), &QueryFilters::default(), &mut out)
            .unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::CatalogError);
        assert!(out.is_empty());
    }
}
