//! Shared request state
//!
//! Built once at boot and shared read-only by every request.

use std::sync::Arc;

use crate::assistant::CompletionProvider;
use crate::auth::TokenVerifier;
use crate::catalog::Catalog;

/// Shared state for all routes
pub struct AppState {
    pub catalog: Catalog,
    pub assistant: Arc<dyn CompletionProvider>,
    /// None when token verification is not configured
    pub verifier: Option<Arc<dyn TokenVerifier>>,
}

impl AppState {
    pub fn new(catalog: Catalog, assistant: Arc<dyn CompletionProvider>) -> Self {
        Self {
            catalog,
            assistant,
            verifier: None,
        }
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }
}
