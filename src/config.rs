// ABOUTME: Configuration loading for supportchat.
// ABOUTME: Reads ~/.supportchat/config.toml, then applies env and CLI overrides.

use std::path::PathBuf;

use serde::Deserialize;

/// Env var overriding the session API base URL.
pub const API_URL_ENV: &str = "SUPPORTCHAT_API_URL";
/// Env var overriding the real-time channel base URL.
pub const WS_URL_ENV: &str = "SUPPORTCHAT_WS_URL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub widget: WidgetConfig,
}

/// Remote endpoints of the support backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_url: String,
    pub ws_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_url: "https://yourdomain.com".to_string(),
            ws_url: "wss://yourdomain.com".to_string(),
        }
    }
}

/// Durable storage for the session identifier.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key under which the session identifier is stored.
    pub key: String,
    /// Explicit storage file; defaults to `storage.json` in the data dir.
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: "chatSessionId".to_string(),
            path: None,
        }
    }
}

impl StorageConfig {
    /// Resolved path of the storage file.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| Config::data_dir().join("storage.json"))
    }
}

/// Presentation settings for the widget panel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub title: String,
    pub placeholder: String,
    pub launcher_label: String,
    pub start_open: bool,
    /// Emit OSC 8 escapes so terminals that support them make links clickable.
    pub hyperlinks: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            title: "Customer support".to_string(),
            placeholder: "Type a message...".to_string(),
            launcher_label: "💬 Chat".to_string(),
            start_open: false,
            hyperlinks: true,
        }
    }
}

impl Config {
    /// Load config from ~/.supportchat/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply endpoint overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(WS_URL_ENV).ok(),
        );
    }

    /// Apply endpoint overrides; `None` and empty values leave the current setting.
    pub fn apply_overrides(&mut self, api_url: Option<String>, ws_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.server.api_url = url;
        }
        if let Some(url) = ws_url.filter(|u| !u.trim().is_empty()) {
            self.server.ws_url = url;
        }
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".supportchat")
            .join("config.toml")
    }

    /// Directory for the storage file and the log file.
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("supportchat")
    }

    /// Path to the tracing log file.
    pub fn log_path() -> PathBuf {
        Self::data_dir().join("widget.log")
    }
}
