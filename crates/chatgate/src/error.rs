//! Error types for chatgate

use thiserror::Error;

/// Main error type for chatgate startup and serving
#[derive(Error, Debug)]
pub enum ChatgateError {
    /// Configuration errors (unreadable file, bad TOML, invalid values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server errors (bind failure, serve loop failure)
    #[error("Server error: {0}")]
    Server(String),

    /// Completion provider setup errors
    #[error("Provider error: {0}")]
    Provider(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for chatgate operations
pub type Result<T> = std::result::Result<T, ChatgateError>;
