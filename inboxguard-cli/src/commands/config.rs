use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::Path;

use inboxguard_dashboard::config::Config;

use crate::utils;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print where the user config file belongs
    Path,
}

pub async fn execute(config_path: Option<&Path>, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(config_path),
        ConfigCommands::Path => path(),
    }
}

fn show(config_path: Option<&Path>) -> Result<()> {
    let config = utils::load_config(config_path)?;
    print!("{}", render(&config)?);
    Ok(())
}

fn path() -> Result<()> {
    let path = Config::recommended_path();
    println!("{}", path.display());

    if !path.exists() {
        utils::info(&format!(
            "No file there yet. Create it to override the defaults, e.g. {}",
            "[api] base_url = \"https://app.example.com/api\"".cyan()
        ));
    }
    Ok(())
}

/// Effective configuration as TOML with the API token masked
fn render(config: &Config) -> Result<String> {
    let mut config = config.clone();
    if config.api.token.is_some() {
        config.api.token = Some("********".to_string());
    }
    toml::to_string_pretty(&config).context("Failed to render configuration as TOML")
}
