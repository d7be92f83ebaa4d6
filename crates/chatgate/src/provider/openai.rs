//! OpenAI Responses API provider
//!
//! Sends the assembled turns as `input` to `{api_url}/responses` and
//! collects the generated text. No retries are attempted: one failed call
//! is one failed chat turn.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ProviderConfig;
use crate::error::{ChatgateError, Result};
use crate::prompt::Turn;

use super::{Completion, CompletionProvider, CompletionRequest, ProviderError};

/// Provider backed by an OpenAI-compatible Responses endpoint
#[derive(Debug)]
pub struct OpenAiProvider {
    client: Client,
    endpoint: String,
    api_key_env: String,
    api_key: Option<String>,
}

/// Responses API request body
#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a [Turn],
    max_output_tokens: u32,
}

/// The subset of the Responses API reply we read
#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Option<Vec<OutputItem>>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Option<Vec<OutputContent>>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesResponse {
    /// Aggregate output text.
    ///
    /// Prefers a top-level `output_text`; otherwise joins every
    /// `output_text` content part in order.
    fn into_text(self) -> String {
        if let Some(text) = self.output_text {
            return text;
        }

        self.output
            .unwrap_or_default()
            .into_iter()
            .flat_map(|item| item.content.unwrap_or_default())
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect()
    }
}

impl OpenAiProvider {
    /// Create a provider, reading the API key from `config.api_key_env`.
    ///
    /// A missing key is not an error here; every call will fail instead.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        Self::with_api_key(config, config.api_key())
    }

    /// Create a provider with an explicit API key
    pub fn with_api_key(config: &ProviderConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ChatgateError::Provider(format!("Failed to create HTTP client: {e}")))?;

        let endpoint = format!("{}/responses", config.api_url.trim_end_matches('/'));

        if api_key.is_none() {
            warn!(
                "API key env var '{}' not set; chat requests will fail",
                config.api_key_env
            );
        }
        info!(
            "OpenAiProvider initialized with model: {}, endpoint: {}",
            config.model, endpoint
        );

        Ok(Self {
            client,
            endpoint,
            api_key_env: config.api_key_env.clone(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> std::result::Result<Completion, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingApiKey(self.api_key_env.clone()))?;

        let body = ResponsesRequest {
            model: &request.model,
            input: &request.input,
            max_output_tokens: request.max_output_tokens,
        };

        debug!(
            "Calling completion API at: {} ({} turns)",
            self.endpoint,
            request.input.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ResponsesResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::Parse(format!("Invalid completion response: {e}")))?;

        Ok(Completion::new(parsed.into_text()))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

fn map_transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else if e.is_connect() {
        ProviderError::Network(format!("Failed to connect to provider: {e}"))
    } else {
        ProviderError::Network(format!("Request failed: {e}"))
    }
}
