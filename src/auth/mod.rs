//! # Auth Module
//!
//! Identity token verification. The capability is available to the HTTP
//! layer, which logs the verified subject but enforces nothing.

pub mod errors;
pub mod verifier;

pub use errors::{AuthError, AuthResult};
pub use verifier::{
    fetch_key_set, FetchedKeySet, IdTokenClaims, IdTokenVerifier, TokenVerifier,
    DEFAULT_JWKS_URL, DEFAULT_MIN_REFETCH_INTERVAL,
};
