//! Integration tests for configuration loading

use std::io::Write;

use tempfile::NamedTempFile;

use chatgate::ChatgateError;
use chatgate::config::{Config, ProviderConfig, load_dotenv_from};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_partial_file_keeps_defaults() {
    let file = write_config(
        r#"
[server]
listen_addr = "127.0.0.1:8080"
allowed_origin = "https://example.org"

[rate_limit]
max_requests = 5
"#,
    );

    let config = Config::load(Some(file.path())).unwrap();

    assert_eq!(config.server.listen_addr, "127.0.0.1:8080");
    assert_eq!(config.server.allowed_origin, "https://example.org");
    assert_eq!(config.server.max_body_bytes, 50 * 1024);
    assert_eq!(config.rate_limit.max_requests, 5);
    assert_eq!(config.rate_limit.window_secs, 60);
    assert_eq!(config.provider.model, "gpt-4.1-mini");
    assert_eq!(config.chat.history_window, 12);
    config.validate().unwrap();
}

#[test]
fn test_load_full_file() {
    let file = write_config(
        r#"
[server]
listen_addr = "0.0.0.0:4000"
allowed_origin = "https://chat.example.org"
max_body_bytes = 1024
trust_forwarded_for = true

[provider]
api_url = "http://localhost:9999/v1"
api_key_env = "CHATGATE_TEST_KEY"
model = "gpt-4o-mini"
max_output_tokens = 200
timeout_secs = 5

[rate_limit]
max_requests = 10
window_secs = 30

[chat]
history_window = 6
fallback_reply = "Sorry, try again."
"#,
    );

    let config = Config::load(Some(file.path())).unwrap();

    assert!(config.server.trust_forwarded_for);
    assert_eq!(config.server.max_body_bytes, 1024);
    assert_eq!(config.provider.api_key_env, "CHATGATE_TEST_KEY");
    assert_eq!(config.provider.max_output_tokens, 200);
    assert_eq!(config.provider.timeout_secs, 5);
    assert_eq!(config.rate_limit.window_secs, 30);
    assert_eq!(config.chat.history_window, 6);
    assert_eq!(config.chat.fallback_reply, "Sorry, try again.");
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ChatgateError::Config(_)));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let file = write_config("[server\nlisten_addr = ");

    let err = Config::load(Some(file.path())).unwrap_err();
    assert!(matches!(err, ChatgateError::Config(ref msg) if msg.contains("parse")));
}

#[test]
fn test_port_override_after_file() {
    let file = write_config("[server]\nlisten_addr = \"127.0.0.1:8080\"\n");

    let mut config = Config::load(Some(file.path())).unwrap();
    config
        .apply_overrides_from(|key| (key == "PORT").then(|| "9090".to_string()))
        .unwrap();

    assert_eq!(config.listen_addr().unwrap().to_string(), "127.0.0.1:9090");
}

#[test]
fn test_validate_rejects_zero_window() {
    let file = write_config("[rate_limit]\nwindow_secs = 0\n");

    let config = Config::load(Some(file.path())).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_env_file_supplies_api_key() {
    let file = write_config(
        "# local secrets\nCHATGATE_ENV_FILE_TEST_KEY=sk-from-env-file\nCHATGATE_ENV_FILE_TEST_PORT=8088\n",
    );

    load_dotenv_from(file.path()).unwrap();

    let provider = ProviderConfig {
        api_key_env: "CHATGATE_ENV_FILE_TEST_KEY".to_string(),
        ..ProviderConfig::default()
    };
    assert_eq!(provider.api_key(), Some("sk-from-env-file".to_string()));
    assert_eq!(
        std::env::var("CHATGATE_ENV_FILE_TEST_PORT").unwrap(),
        "8088"
    );
}

#[test]
fn test_env_file_does_not_override_process_env() {
    unsafe { std::env::set_var("CHATGATE_ENV_FILE_TEST_PRESET", "from-process") };
    let file = write_config("CHATGATE_ENV_FILE_TEST_PRESET=from-file\n");

    load_dotenv_from(file.path()).unwrap();

    assert_eq!(
        std::env::var("CHATGATE_ENV_FILE_TEST_PRESET").unwrap(),
        "from-process"
    );
}

#[test]
fn test_missing_env_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_dotenv_from(&dir.path().join(".env")).unwrap_err();
    assert!(matches!(err, ChatgateError::Config(_)));
}
