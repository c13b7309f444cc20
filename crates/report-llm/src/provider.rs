//! Completion provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for completion providers
///
/// Implementations give access to a hosted chat completion service. A single
/// provider instance is constructed once per process and shared behind an
/// `Arc`, so implementations must be `Send + Sync`.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion for the given prompt
    ///
    /// Returns [`crate::LLMError::EmptyCompletion`] when the service answers
    /// without any choices.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "openai")
    fn name(&self) -> &str;
}
