//! Configuration loading from disk.

use std::path::Path;
use std::fs;
use thiserror::Error;

use crate::config::schema::{Mode, ServerConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that switches the server to production mode.
pub const APP_ENV: &str = "APP_ENV";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, std::env::var(APP_ENV).ok().as_deref())
}

/// Parse, apply environment overrides, and validate.
pub fn parse_config(content: &str, app_env: Option<&str>) -> Result<ServerConfig, ConfigError> {
    let mut config: ServerConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config, app_env);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// `APP_ENV=production` forces production mode regardless of the file.
pub fn apply_env_overrides(config: &mut ServerConfig, app_env: Option<&str>) {
    if app_env == Some("production") {
        config.inertia.mode = Mode::Production;
    }
}
