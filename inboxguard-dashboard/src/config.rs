//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: INBOXGUARD_, nested keys split on `__`)
//! 2. Current working directory: ./inboxguard.toml
//! 3. XDG config directory: ~/.config/inboxguard/config.toml
//! 4. Default values
//!
//! ```toml
//! [api]
//! base_url = "https://app.example.com/api"
//! login_url = "https://app.example.com/login"
//! timeout_secs = 15
//!
//! [table]
//! default_limit = 50
//!
//! [log]
//! level = "debug"
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::pagination::{RowLimit, DEFAULT_PAGE};

const APP_NAME: &str = "inboxguard";
const ENV_PREFIX: &str = "INBOXGUARD_";
const LOCAL_CONFIG_FILE: &str = "inboxguard.toml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend API access
    #[serde(default)]
    pub api: ApiConfig,

    /// Table defaults
    #[serde(default)]
    pub table: TableConfig,

    /// Logging
    #[serde(default)]
    pub log: LogConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every relative API path is joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Where to send the user when the API answers 401
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// Default request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Bearer token attached to every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ApiConfig {
    /// Default request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login_url: default_login_url(),
            timeout_secs: default_timeout(),
            token: None,
        }
    }
}

/// Defaults for newly mounted tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Rows per page (20 or 50)
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// First page shown
    #[serde(default = "default_page")]
    pub default_page: u32,
}

impl TableConfig {
    /// Validated row limit
    pub fn row_limit(&self) -> Result<RowLimit> {
        RowLimit::try_from(self.default_limit)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            default_page: default_page(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_login_url() -> String {
    "http://localhost:3000/login".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_limit() -> u32 {
    RowLimit::default().get()
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Environment variables (INBOXGUARD_ prefix) override all file-based configs.
    pub fn load() -> Result<Self> {
        let mut figment = Self::defaults();

        // Lowest priority first so later merges win
        for path in Self::find_config_paths().iter().rev() {
            if path.exists() {
                tracing::debug!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        let config = figment.merge(Self::env()).extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Bypasses the search path; environment variables still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("config file not found: {}", path.display()),
            )));
        }

        let config = Self::defaults()
            .merge(Toml::file(path))
            .merge(Self::env())
            .extract()?;
        Ok(config)
    }

    /// Where the config file should live for the current user
    ///
    /// Returns ~/.config/inboxguard/config.toml, creating the directory if needed.
    pub fn recommended_path() -> PathBuf {
        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME);
        xdg_dirs.place_config_file("config.toml").unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| String::from("~")))
                .join(".config")
                .join(APP_NAME)
                .join("config.toml")
        })
    }

    fn defaults() -> Figment {
        Figment::new().merge(Serialized::defaults(Config::default()))
    }

    fn env() -> Env {
        Env::prefixed(ENV_PREFIX).split("__")
    }

    /// Candidate config files, highest priority first
    fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME);
        if let Some(path) = xdg_dirs.find_config_file("config.toml") {
            paths.push(path);
        }

        paths
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            table: TableConfig::default(),
            log: LogConfig::default(),
        }
    }
}
