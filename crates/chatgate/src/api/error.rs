//! HTTP-facing errors
//!
//! Every variant renders as `{"error": "<fixed message>"}`. Provider detail
//! is kept out of the body; callers log it before converting.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::provider::ProviderError;

/// Errors returned to chat clients
#[derive(Error, Debug)]
pub enum ApiError {
    /// `message` absent, not a string, or blank
    #[error("Missing message")]
    MissingMessage,

    /// Completion provider failed
    #[error("Server error")]
    Provider(#[source] ProviderError),

    /// `Origin` header present but not the configured one
    #[error("Origin not allowed")]
    OriginNotAllowed,

    /// Client exceeded its request budget for the current window
    #[error("Too many requests, please try again later.")]
    RateLimited { retry_after_secs: u64 },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingMessage => StatusCode::BAD_REQUEST,
            ApiError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::OriginNotAllowed => StatusCode::FORBIDDEN,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        ApiError::Provider(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        let mut response = (self.status(), body).into_response();

        if let ApiError::RateLimited { retry_after_secs } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}
