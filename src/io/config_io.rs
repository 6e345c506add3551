use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::ClientConfig;

/// Error type for reading the client config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Default config file path: `$MICROTASK_CONFIG`, else
/// `$XDG_CONFIG_HOME/microtask/config.toml`, else `~/.config/microtask/config.toml`.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("MICROTASK_CONFIG") {
        return PathBuf::from(path);
    }
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("microtask").join("config.toml")
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Parse config text. Every field has a default, so an empty file is valid.
pub fn parse_config(text: &str, path: &Path) -> Result<ClientConfig, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the config at `path`. A missing file yields the defaults.
pub fn read_config_from(path: &Path) -> Result<ClientConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ClientConfig::default());
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text, path)
}

/// Apply environment overrides, looked up through `var` so tests don't
/// have to touch the process environment.
pub fn apply_env_overrides(config: &mut ClientConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(url) = var("MICROTASK_API_URL").filter(|u| !u.trim().is_empty()) {
        config.api.url = url;
    }
}

/// Load the config: an explicit path must exist, the default path may not.
pub fn load_config(explicit: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let mut config = match explicit {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
                path: path.to_path_buf(),
                source,
            })?;
            parse_config(&text, path)?
        }
        None => read_config_from(&config_path())?,
    };
    apply_env_overrides(&mut config, |k| std::env::var(k).ok());
    Ok(config)
}
