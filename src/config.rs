// ABOUTME: Configuration loading for chatline.
// ABOUTME: Reads ~/.chatline/config.toml, then applies environment and CLI overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Environment variable that overrides `endpoint.base_url`.
pub const ENDPOINT_ENV: &str = "CHATLINE_ENDPOINT";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// Where and how chat requests are sent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    pub chat_path: String,
    /// Per-request timeout. Unset means the transport's own behavior applies.
    pub request_timeout_secs: Option<u64>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            chat_path: "/chat".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl EndpointConfig {
    /// Full URL of the chat endpoint.
    pub fn chat_url(&self) -> String {
        join_url(&self.base_url, &self.chat_path)
    }

    /// Full URL of an arbitrary path on the same server.
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Terminal presentation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub title: String,
    /// Lines moved per PageUp/PageDown.
    pub page_scroll: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "chatline".to_string(),
            page_scroll: 10,
        }
    }
}

/// Diagnostic log settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `CHATLINE_LOG` is unset.
    pub level: String,
    /// Log file path. Defaults to ~/.chatline/chatline.log.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn file_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| Config::config_dir().join("chatline.log"))
    }
}

impl Config {
    /// Load config from ~/.chatline/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Apply endpoint overrides. The CLI flag wins over the environment, which wins over the file.
    pub fn apply_endpoint_overrides(&mut self, env: Option<String>, cli: Option<String>) {
        if let Some(url) = cli.or(env).filter(|s| !s.trim().is_empty()) {
            self.endpoint.base_url = url.trim().to_string();
        }
    }

    /// Directory holding config and logs.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".chatline")
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.endpoint.base_url, "http://localhost:5000");
        assert_eq!(config.endpoint.chat_path, "/chat");
        assert_eq!(config.endpoint.request_timeout(), None);
        assert_eq!(config.ui.page_scroll, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_config_toml() {
        let toml_str = r#"
[endpoint]
base_url = "https://chat.example.com"
chat_path = "/api/chat"
request_timeout_secs = 30

[ui]
title = "support"
page_scroll = 5

[logging]
level = "debug"
file = "/tmp/chatline-test.log"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoint.chat_url(), "https://chat.example.com/api/chat");
        assert_eq!(config.endpoint.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.ui.title, "support");
        assert_eq!(config.ui.page_scroll, 5);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.logging.file_path(),
            PathBuf::from("/tmp/chatline-test.log")
        );
    }

    #[test]
    fn parse_partial_config_uses_defaults() {
        let toml_str = r#"
[endpoint]
base_url = "http://10.0.0.2:8080"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoint.chat_url(), "http://10.0.0.2:8080/chat");
        assert_eq!(config.ui.title, "chatline");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn chat_url_handles_slashes() {
        let endpoint = EndpointConfig {
            base_url: "http://host/".to_string(),
            chat_path: "chat".to_string(),
            request_timeout_secs: None,
        };
        assert_eq!(endpoint.chat_url(), "http://host/chat");
        assert_eq!(endpoint.url_for("/test-api"), "http://host/test-api");
    }

    #[test]
    fn cli_override_beats_env() {
        let mut config = Config::default();
        config.apply_endpoint_overrides(
            Some("http://from-env".to_string()),
            Some("http://from-cli".to_string()),
        );
        assert_eq!(config.endpoint.base_url, "http://from-cli");
    }

    #[test]
    fn env_override_applies_without_cli() {
        let mut config = Config::default();
        config.apply_endpoint_overrides(Some("http://from-env".to_string()), None);
        assert_eq!(config.endpoint.base_url, "http://from-env");
    }

    #[test]
    fn blank_override_is_ignored() {
        let mut config = Config::default();
        config.apply_endpoint_overrides(Some("   ".to_string()), None);
        assert_eq!(config.endpoint.base_url, "http://localhost:5000");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.endpoint.base_url, "http://localhost:5000");
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "endpoint = 42").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }
}
