mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use std::path::Path;
use tracing::debug;

/// Environment variable holding the remote provider credential.
pub const TOKEN_ENV: &str = "HF_TOKEN";

/// Loads `.env`, then the YAML file named by `CONFIG_PATH` (if present),
/// then the required credential from the environment.
pub async fn load() -> Result<Config> {
    // A missing .env file is fine; the variables may come from the shell.
    let _ = dotenv::dotenv();

    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    let mut config = load_file(&config_path).await?;

    config.remote.token = env::var(TOKEN_ENV).unwrap_or_default();
    validate(&config)?;

    Ok(config)
}

/// Parses a YAML config file, returning defaults when the file does not exist.
pub async fn load_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();

    if !tokio::fs::try_exists(path).await? {
        debug!("No configuration file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

pub fn validate(config: &Config) -> Result<()> {
    if config.remote.token.trim().is_empty() {
        return Err(Error::config(format!(
            "{} not found in the environment or .env file",
            TOKEN_ENV
        )));
    }

    if config.remote.base_url.is_none() && config.remote.space.trim().is_empty() {
        return Err(Error::config("remote.space or remote.base_url must be set"));
    }

    if !config.remote.api_name.starts_with('/') {
        return Err(Error::config(format!(
            "remote.api_name must start with '/': {}",
            config.remote.api_name
        )));
    }

    Ok(())
}
