//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::{config::LogConfig, error::Result};

/// Initialize tracing
///
/// `RUST_LOG` takes precedence over `config.level`. Calling this more than once
/// keeps the first subscriber and returns `Ok`.
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"))
    });

    let installed = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::debug!(level = %config.level, json = config.json, "Tracing initialized");
    }

    Ok(())
}
