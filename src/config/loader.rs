// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;
use crate::errors::ConfigError;

/// Load a configuration file from a given path and return the raw `ConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a configuration file from path and run basic validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile, ConfigError> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load the config named on the command line, or the default one if present.
///
/// - `Some(path)`: the file must exist.
/// - `None`: [`default_config_path`] is used when it exists, otherwise the
///   built-in defaults apply.
///
/// No semantic validation happens here: CLI overrides are applied first and
/// [`crate::config::Settings::resolve`] validates the merged result.
pub fn load_optional(explicit: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    match explicit {
        Some(path) => load_from_path(path),
        None => {
            let path = default_config_path();
            if path.is_file() {
                load_from_path(&path)
            } else {
                debug!(path = ?path, "no config file found; using defaults");
                Ok(ConfigFile::default())
            }
        }
    }
}

/// `Watchserve.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Watchserve.toml")
}
