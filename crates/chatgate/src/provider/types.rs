//! Completion request/response types and provider errors

use crate::prompt::Turn;

/// A fully assembled completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,
    /// Ordered turns, system instructions first
    pub input: Vec<Turn>,
    /// Output length ceiling in provider tokens
    pub max_output_tokens: u32,
}

/// Text produced by the provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// Aggregated output text; may be empty
    pub text: String,
}

impl Completion {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The output text, or `fallback` when the provider produced nothing
    pub fn reply_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.text.is_empty() {
            fallback
        } else {
            &self.text
        }
    }
}

/// Provider-specific errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("API key env var '{0}' not set")]
    MissingApiKey(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ProviderError::MissingApiKey(_) => "auth",
            ProviderError::Timeout(_) => "timeout",
            ProviderError::Network(_) => "network",
            ProviderError::Api { .. } => "api",
            ProviderError::Parse(_) => "parse",
        }
    }
}
