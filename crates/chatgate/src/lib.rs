//! chatgate - HTTP gateway between a website chat widget and an LLM API
//!
//! Each `POST /chat` turn is validated, combined with fixed system
//! instructions and a bounded slice of client history, and relayed to a
//! completion provider. Origin restriction, per-client rate limiting and
//! body size limits are enforced in middleware.

pub mod api;
pub mod config;
pub mod error;
pub mod prompt;
pub mod provider;

pub use error::ChatgateError;
