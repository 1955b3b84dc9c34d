use std::path::{Path, PathBuf};

use roomfit_client::DEFAULT_BASE_URL;
use roomfit_core::LayoutConfig;
use serde::Deserialize;

use crate::error::RfError;

pub const API_URL_ENV: &str = "ROOMFIT_API_URL";

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ApiConfig {
    pub base_url: Option<String>,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("roomfit").join("config.toml"))
}

/// Directory for the studio log file.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("roomfit"))
        .unwrap_or_else(|| PathBuf::from(".roomfit"))
}

pub fn read_config(path: &Path) -> Result<Config, RfError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Loads the user config, falling back to defaults when it is missing or
/// unreadable.
pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };

    match read_config(&path) {
        Ok(config) => config,
        Err(RfError::Io(_)) => Config::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
            Config::default()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Picks the backend URL: CLI flag, then environment, then config file.
pub fn resolve_base_url(
    cli: Option<String>,
    env: Option<String>,
    config: &Config,
) -> String {
    non_empty(cli)
        .or_else(|| non_empty(env))
        .or_else(|| non_empty(config.api.base_url.clone()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}
