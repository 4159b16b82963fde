//! Observable events for the storefront service
//!
//! Events are explicit and typed. Each event carries the severity it is
//! logged at, so call sites never pick a level ad hoc.

use std::fmt;

use super::logger::Severity;

/// Observable events in the storefront service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Service startup begins
    BootStart,
    /// HTTP listener bound, ready to serve
    Serving,

    // Configuration
    /// Environment configuration loaded
    ConfigLoaded,
    /// Required configuration missing (FATAL)
    ConfigInvalid,

    // Catalog
    /// Catalog file parsed
    CatalogLoaded,
    /// Catalog file missing or malformed, serving an empty catalog
    CatalogLoadFailed,

    // Identity
    /// Token verifier has its signing keys
    VerifierReady,
    /// Boot fetch of signing keys failed; retried on the next token
    VerifierUnavailable,
    /// Signing keys fetched from the provider
    SigningKeysRefreshed,
    /// Bearer token verified
    TokenVerified,
    /// Bearer token rejected
    TokenRejected,

    // Requests
    /// Product query evaluated
    ProductsQueried,
    /// Chat request rejected before reaching the provider
    ChatRejected,
    /// Chat completion returned
    ChatCompleted,
    /// Chat completion failed upstream
    ChatFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "STOREFRONT_STARTUP_BEGIN",
            Event::Serving => "STOREFRONT_SERVING",

            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigInvalid => "CONFIG_INVALID",

            Event::CatalogLoaded => "CATALOG_LOADED",
            Event::CatalogLoadFailed => "CATALOG_LOAD_FAILED",

            Event::VerifierReady => "VERIFIER_READY",
            Event::VerifierUnavailable => "VERIFIER_UNAVAILABLE",
            Event::SigningKeysRefreshed => "SIGNING_KEYS_REFRESHED",
            Event::TokenVerified => "TOKEN_VERIFIED",
            Event::TokenRejected => "TOKEN_REJECTED",

            Event::ProductsQueried => "PRODUCTS_QUERIED",
            Event::ChatRejected => "CHAT_REJECTED",
            Event::ChatCompleted => "CHAT_COMPLETED",
            Event::ChatFailed => "CHAT_FAILED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigInvalid => Severity::Fatal,
            Event::ChatFailed => Severity::Error,
            Event::CatalogLoadFailed
            | Event::VerifierUnavailable
            | Event::TokenRejected
            | Event::ChatRejected => Severity::Warn,
            _ => Severity::Info,
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Event; 15] = [
        Event::BootStart,
        Event::Serving,
        Event::ConfigLoaded,
        Event::ConfigInvalid,
        Event::CatalogLoaded,
        Event::CatalogLoadFailed,
        Event::VerifierReady,
        Event::VerifierUnavailable,
        Event::SigningKeysRefreshed,
        Event::TokenVerified,
        Event::TokenRejected,
        Event::ProductsQueried,
        Event::ChatRejected,
        Event::ChatCompleted,
        Event::ChatFailed,
    ];

    #[test]
    fn test_all_events_have_string_representation() {
        for event in ALL {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_fatal_events() {
        assert!(Event::ConfigInvalid.is_fatal());
        assert!(!Event::CatalogLoadFailed.is_fatal());
        assert!(!Event::ChatFailed.is_fatal());
    }

    #[test]
    fn test_degraded_startup_is_a_warning() {
        assert_eq!(Event::CatalogLoadFailed.severity(), Severity::Warn);
        assert_eq!(Event::VerifierUnavailable.severity(), Severity::Warn);
        assert_eq!(Event::CatalogLoaded.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::ProductsQueried), "PRODUCTS_QUERIED");
    }
}
