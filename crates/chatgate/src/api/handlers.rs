//! Route handlers: chat turn relay and liveness

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::prompt::{SYSTEM_INSTRUCTIONS, assemble_prompt, bound_history};
use crate::provider::CompletionRequest;

use super::error::ApiError;
use super::server::AppState;

/// Inbound chat turn.
///
/// Fields are kept as raw JSON so that wrong types are a validation
/// failure rather than a parse failure.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: Value,
    pub history: Value,
}

impl ChatRequest {
    /// Read a request body. Anything other than a JSON object yields an
    /// empty request.
    pub fn from_slice(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(mut fields)) => Self {
                message: fields.remove("message").unwrap_or_default(),
                history: fields.remove("history").unwrap_or_default(),
            },
            Ok(_) => {
                debug!("Chat body is JSON but not an object");
                Self::default()
            }
            Err(e) => {
                debug!("Chat body is not valid JSON: {e}");
                Self::default()
            }
        }
    }

    /// The trimmed message, if it is a non-blank string
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_str()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// Whether the request declares a JSON body (`application/json`, any
/// parameters). Other bodies are never parsed.
pub fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Successful chat reply
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/// `GET /health`
pub async fn health_handler() -> &'static str {
    "ok"
}

/// `POST /chat`
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChatReply>, ApiError> {
    let request = if has_json_content_type(&headers) {
        ChatRequest::from_slice(&body)
    } else {
        debug!("Chat body is not declared as JSON");
        ChatRequest::default()
    };
    let message = request.message().ok_or(ApiError::MissingMessage)?;

    let history = bound_history(&request.history, state.config.chat.history_window);
    debug!("Forwarding chat turn with {} history turns", history.len());

    let completion_request = CompletionRequest {
        model: state.config.provider.model.clone(),
        input: assemble_prompt(SYSTEM_INSTRUCTIONS, history, message),
        max_output_tokens: state.config.provider.max_output_tokens,
    };

    let completion = state
        .provider
        .complete(completion_request)
        .await
        .map_err(|e| {
            error!(
                error_type = e.category(),
                error_message = %e,
                provider = state.provider.name(),
                "Completion request failed"
            );
            ApiError::from(e)
        })?;

    Ok(Json(ChatReply {
        reply: completion
            .reply_or(&state.config.chat.fallback_reply)
            .to_string(),
    }))
}
