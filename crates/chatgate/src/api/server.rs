//! HTTP server for the chat gateway
//!
//! Routes:
//! - `POST /chat`: origin guard and rate limit, then the chat handler
//! - `GET /health`: liveness, never limited
//!
//! Every response passes through tracing, hardening headers, CORS and the
//! body size limit.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{ChatgateError, Result};
use crate::provider::CompletionProvider;

use super::handlers::{chat_handler, health_handler};
use super::middleware::{
    RateLimiter, cors_layer, origin_guard, rate_limit_middleware, security_headers,
};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Process-wide configuration, read-only after startup
    pub config: Arc<Config>,
    /// Completion provider for chat turns
    pub provider: Arc<dyn CompletionProvider>,
    /// Per-client request counter
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn CompletionProvider>) -> Self {
        let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));
        Self {
            config: Arc::new(config),
            provider,
            limiter,
        }
    }
}

/// The chat gateway server
pub struct ChatServer {
    config: Config,
    provider: Arc<dyn CompletionProvider>,
}

impl ChatServer {
    pub fn new(config: Config, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { config, provider }
    }

    /// Start the server and listen for requests until shutdown
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = self.config.listen_addr()?;

        let state = Arc::new(AppState::new(self.config, self.provider));
        tokio::spawn(Arc::clone(&state.limiter).start_sweep_task());

        tracing::info!("Allowed origin: {}", state.config.server.allowed_origin);
        tracing::info!(
            "Rate limit: {} requests per {}s per client",
            state.config.rate_limit.max_requests,
            state.config.rate_limit.window_secs
        );
        tracing::info!(
            "Completion provider: {} (model {})",
            state.provider.name(),
            state.config.provider.model
        );

        let app = create_router(state);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ChatgateError::Server(format!("Failed to bind to {addr}: {e}")))?;

        tracing::info!("Chat gateway running on {addr}");

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ChatgateError::Server(format!("Server error: {e}")))?;

        tracing::info!("Chat gateway shut down gracefully");
        Ok(())
    }
}

/// Create the router with all routes and layers configured
pub fn create_router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.server.max_body_bytes;

    // route_layer: the last one added runs first
    let chat_routes = Router::new()
        .route("/chat", post(chat_handler))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            origin_guard,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .merge(chat_routes)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(cors_layer(&state.config.server.allowed_origin))
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}
