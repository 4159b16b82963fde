//! Text-completion capability

use std::future::Future;
use std::pin::Pin;

use super::errors::AssistantResult;

/// Completes a prompt with generated text
///
/// Object safe so the HTTP state can hold any provider behind an `Arc`.
pub trait CompletionProvider: Send + Sync {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = AssistantResult<String>> + Send + 'a>>;
}
