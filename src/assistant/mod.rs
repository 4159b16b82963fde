//! # Assistant Module
//!
//! Pass-through text completion for the shopping chat.

mod errors;
mod gemini;
mod provider;

pub use errors::{AssistantError, AssistantResult};
pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use provider::CompletionProvider;
