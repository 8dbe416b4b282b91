//! CLI command implementations

use anyhow::Result;
use std::fs;

use crate::api;
use crate::cli::{error, info, success, warn};
use crate::config::{self, Config};
use crate::error::Error;

/// Initialize a new authgate.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("authgate.toml");

    if config_path.exists() {
        warn("authgate.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created authgate.toml");
    info("Edit the configuration file and run 'authgate serve' to start the server");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config_or_default()?;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server on {}:{}", host, port));

    if let Err(e) = api::run_server(config, &host, port).await {
        error(&format!("Server error: {}", e));
        return Err(e.into());
    }

    Ok(())
}

/// Load configuration, falling back to defaults when no file exists
fn load_config_or_default() -> Result<Config> {
    match config::load_config() {
        Ok(config) => Ok(config),
        Err(Error::ConfigNotFound) => {
            warn("No authgate.toml found, using default configuration");
            Ok(Config::default())
        }
        Err(e) => Err(e.into()),
    }
}
