use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use inboxguard_dashboard::config::Config;
use inboxguard_dashboard::gateway::ApiClient;
use inboxguard_dashboard::observability::init_tracing;
use inboxguard_dashboard::pagination::RowLimit;
use inboxguard_dashboard::records::Resource;

pub mod format;

/// Loaded configuration plus a client built from it
pub struct Session {
    pub config: Config,
    pub client: Arc<ApiClient>,
}

impl Session {
    /// Load config, start logging and build the API client
    pub fn open(config_path: Option<&Path>, verbose: bool) -> Result<Self> {
        let mut config = load_config(config_path)?;
        if verbose {
            config.log.level = "debug".to_string();
        }
        init_tracing(&config.log)?;

        let client = ApiClient::new(&config.api).context("Failed to build API client")?;
        tracing::debug!(base_url = %config.api.base_url, "API client ready");

        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    /// Explicit limit, else the configured default
    pub fn row_limit(&self, limit: Option<RowLimit>) -> Result<RowLimit> {
        match limit {
            Some(limit) => Ok(limit),
            None => Ok(self.config.table.row_limit()?),
        }
    }
}

/// Load configuration from `path`, or from the default search path
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// clap value parser for resource names
pub fn parse_resource(value: &str) -> std::result::Result<Resource, String> {
    value.parse::<Resource>().map_err(|_| {
        let names: Vec<String> = Resource::ALL.iter().map(ToString::to_string).collect();
        format!("expected one of: {}", names.join(", "))
    })
}

/// clap value parser for row limits
pub fn parse_limit(value: &str) -> std::result::Result<RowLimit, String> {
    let raw: u32 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    RowLimit::try_from(raw).map_err(|e| e.to_string())
}

/// Spinner shown while a request is in flight
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .map(|style| style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "))
    {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Await `future` behind a spinner, clearing it afterwards
pub async fn with_spinner<F, R>(message: impl Into<String>, future: F) -> R
where
    F: Future<Output = R>,
{
    let pb = spinner(message);
    let output = future.await;
    pb.finish_and_clear();
    output
}

/// Success message with checkmark
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Info message
pub fn info(message: &str) {
    println!("{} {}", "→".blue().bold(), message);
}

/// Warning message
pub fn warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Section header
pub fn section(title: &str) {
    println!("\n{}", title.bold().underline());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resource() {
        assert_eq!(parse_resource("mailboxes").unwrap(), Resource::Mailboxes);
        assert_eq!(parse_resource("audit-log").unwrap(), Resource::AuditLog);

        let err = parse_resource("inboxes").unwrap_err();
        assert!(err.contains("campaigns"));
        assert!(err.contains("audit-log"));
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("20").unwrap(), RowLimit::Twenty);
        assert_eq!(parse_limit("50").unwrap(), RowLimit::Fifty);
        assert!(parse_limit("30").unwrap_err().contains("30"));
        assert!(parse_limit("lots").unwrap_err().contains("not a number"));
    }

    #[test]
    fn test_load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inboxguard.toml");
        std::fs::write(&path, "[api]\nbase_url = \"https://api.test/api\"\n").unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.api.base_url, "https://api.test/api");
    }

    #[test]
    fn test_load_config_missing_path_fails() {
        assert!(load_config(Some(Path::new("/nonexistent/inboxguard.toml"))).is_err());
    }
}
