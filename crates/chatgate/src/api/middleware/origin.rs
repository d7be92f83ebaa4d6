//! Origin restriction for browser callers
//!
//! Requests carrying an `Origin` header must come from the configured site.
//! Requests without one (curl, server-side callers) pass through; CORS
//! headers are only ever issued for the allowed origin.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::warn;

use crate::api::error::ApiError;
use crate::api::server::AppState;

/// Compare a request origin against the configured one, ignoring a
/// trailing slash on the configured value
pub fn origin_allowed(origin: &str, allowed: &str) -> bool {
    origin == allowed.trim_end_matches('/')
}

/// Reject requests whose `Origin` header names another site
pub async fn origin_guard(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let allowed = origin
            .to_str()
            .is_ok_and(|o| origin_allowed(o, &state.config.server.allowed_origin));
        if !allowed {
            warn!(origin = ?origin, "Rejected request from disallowed origin");
            return ApiError::OriginNotAllowed.into_response();
        }
    }

    next.run(request).await
}

/// CORS layer admitting only `allowed_origin` and only `POST`.
///
/// Preflight request headers are echoed back.
pub fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let allowed = allowed_origin.trim_end_matches('/').to_string();
    let allow_origin = match HeaderValue::from_str(&allowed) {
        Ok(value) => AllowOrigin::exact(value),
        Err(e) => {
            warn!("Allowed origin '{allowed}' is not a valid header value: {e}");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST])
        .allow_headers(AllowHeaders::mirror_request())
}
