//! # Auth Errors
//!
//! Error types for identity token verification.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Token verification errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // ==================
    // Token Errors
    // ==================
    /// Token is not a decodable JWT
    #[error("Malformed token")]
    MalformedToken,

    /// Token header names no key, or a key we do not hold
    #[error("Unknown signing key: {0}")]
    UnknownKey(String),

    /// Token was signed with an algorithm we do not accept
    #[error("Unexpected token algorithm")]
    UnexpectedAlgorithm,

    /// Token has expired
    #[error("Token expired")]
    TokenExpired,

    /// Signature does not verify
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token was issued for another project
    #[error("Token audience mismatch")]
    InvalidAudience,

    /// Token was not issued by the identity provider
    #[error("Token issuer mismatch")]
    InvalidIssuer,

    /// Token carries no subject
    #[error("Token has no subject")]
    MissingSubject,

    // ==================
    // Key Set Errors
    // ==================
    /// Signing keys could not be fetched
    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(String),

    /// A published key could not be used
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MalformedToken => 400,

            AuthError::UnknownKey(_)
            | AuthError::UnexpectedAlgorithm
            | AuthError::TokenExpired
            | AuthError::InvalidSignature
            | AuthError::InvalidAudience
            | AuthError::InvalidIssuer
            | AuthError::MissingSubject => 401,

            AuthError::KeyFetch(_) | AuthError::InvalidKey(_) => 500,
        }
    }

    /// Whether the caller's token is at fault
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::MalformedToken.status_code(), 400);
        assert_eq!(AuthError::TokenExpired.status_code(), 401);
        assert_eq!(AuthError::KeyFetch("timeout".into()).status_code(), 500);
    }

    #[test]
    fn test_client_errors() {
        assert!(AuthError::InvalidSignature.is_client_error());
        assert!(!AuthError::InvalidKey("rsa".into()).is_client_error());
    }
}
