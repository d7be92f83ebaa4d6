//! Completion provider abstraction
//!
//! The chat handler talks to the upstream LLM only through the
//! [`CompletionProvider`] trait, so tests can substitute a mock.

mod openai;
mod types;

pub use openai::OpenAiProvider;
pub use types::{Completion, CompletionRequest, ProviderError};

use async_trait::async_trait;

/// Trait for completion providers
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send an assembled prompt and return the generated text
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
