//! # Assistant Errors
//!
//! Failures of the upstream text-completion provider. The HTTP layer
//! reports all of them as a single upstream failure; the variants only
//! add detail to logs and messages.

use thiserror::Error;

/// Result type for completion calls
pub type AssistantResult<T> = Result<T, AssistantError>;

/// Text-completion errors
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Request never produced an HTTP response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("provider returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Provider answered 2xx with a body that is not a completion
    #[error("undecodable response from provider: {0}")]
    Decode(#[from] serde_json::Error),

    /// Provider refused the prompt
    #[error("prompt blocked: {0}")]
    Blocked(String),

    /// Provider answered without any text
    #[error("empty response from provider")]
    EmptyResponse,
}

impl AssistantError {
    /// Short machine-readable kind for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            AssistantError::Transport(_) => "transport",
            AssistantError::Upstream { .. } => "upstream",
            AssistantError::Decode(_) => "decode",
            AssistantError::Blocked(_) => "blocked",
            AssistantError::EmptyResponse => "empty",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message() {
        let err = AssistantError::Upstream {
            status: 429,
            message: "Resource has been exhausted".to_string(),
        };
        assert_eq!(err.to_string(), "provider returned 429: Resource has been exhausted");
        assert_eq!(err.kind(), "upstream");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(AssistantError::EmptyResponse.kind(), "empty");
        assert_eq!(AssistantError::Blocked("SAFETY".into()).kind(), "blocked");

        let decode = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert_eq!(AssistantError::from(decode).kind(), "decode");
    }
}
