use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ChatgateError, Result};

/// Environment variable that overrides the listening port
pub const PORT_ENV: &str = "PORT";

/// Main configuration structure for chatgate
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP listener and request hygiene settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Per-client rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Chat turn handling
    #[serde(default)]
    pub chat: ChatConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:3000")
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// The single browser origin allowed to call `/chat`
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Key rate limiting on the first `X-Forwarded-For` address instead of the peer
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            allowed_origin: default_allowed_origin(),
            max_body_bytes: default_max_body_bytes(),
            trust_forwarded_for: false,
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_allowed_origin() -> String {
    "https://mwo-prague.org".to_string()
}

fn default_max_body_bytes() -> usize {
    50 * 1024
}

/// Completion provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Environment variable name holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Model identifier sent with every completion
    #[serde(default = "default_model")]
    pub model: String,
    /// Output length ceiling in provider tokens
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key_env: default_api_key_env(),
            model: default_model(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// Read the API key from the configured environment variable.
    ///
    /// Empty values count as unset.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_max_output_tokens() -> u32 {
    450
}

fn default_timeout_secs() -> u64 {
    30
}

/// Fixed-window rate limit configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per client per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

fn default_max_requests() -> u32 {
    30
}

fn default_window_secs() -> u64 {
    60
}

/// Chat turn handling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Number of most recent history entries forwarded to the provider
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Reply sent when the provider returns no text
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            fallback_reply: default_fallback_reply(),
        }
    }
}

fn default_history_window() -> usize {
    12
}

fn default_fallback_reply() -> String {
    "Please try again.".to_string()
}

impl Config {
    /// Load configuration from an explicit path, or from the first default
    /// location that exists, falling back to built-in defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        for path in default_config_paths() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(&path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChatgateError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| ChatgateError::Config(format!("Failed to parse config: {e}")))
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using the given variable lookup.
    ///
    /// `PORT` replaces the port of `server.listen_addr`. A blank value
    /// counts as unset.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV).filter(|p| !p.trim().is_empty()) {
            let port: u16 = port.trim().parse().map_err(|e| {
                ChatgateError::Config(format!("Invalid {PORT_ENV} value '{port}': {e}"))
            })?;
            let mut addr = self.listen_addr()?;
            addr.set_port(port);
            self.server.listen_addr = addr.to_string();
        }
        Ok(())
    }

    /// Parsed listen address
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.server
            .listen_addr
            .parse()
            .map_err(|e| ChatgateError::Config(format!("Invalid listen address: {e}")))
    }

    /// Check values that would otherwise fail at request time
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;

        if self.server.allowed_origin.trim().is_empty() {
            return Err(ChatgateError::Config(
                "server.allowed_origin must not be empty".to_string(),
            ));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ChatgateError::Config(
                "rate_limit.max_requests must be greater than zero".to_string(),
            ));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ChatgateError::Config(
                "rate_limit.window_secs must be greater than zero".to_string(),
            ));
        }
        url::Url::parse(&self.provider.api_url).map_err(|e| {
            ChatgateError::Config(format!(
                "Invalid provider.api_url '{}': {e}",
                self.provider.api_url
            ))
        })?;

        Ok(())
    }
}

/// Load variables from a `.env` file in the working directory or its
/// parents. Variables already set in the process win. Returns the file
/// that was read, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Load variables from a specific env file. Variables already set in the
/// process win.
pub fn load_dotenv_from(path: &Path) -> Result<()> {
    dotenvy::from_path(path).map_err(|e| {
        ChatgateError::Config(format!(
            "Failed to load env file {}: {e}",
            path.display()
        ))
    })
}

fn default_config_paths() -> Vec<PathBuf> {
    [
        dirs::home_dir().map(|h| h.join(".chatgate").join("config.toml")),
        dirs::config_dir().map(|c| c.join("chatgate").join("config.toml")),
        Some(PathBuf::from("config.toml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}
