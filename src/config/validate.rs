// src/config/validate.rs

use std::net::IpAddr;

use crate::config::model::ConfigFile;
use crate::errors::ConfigError;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - there is at least one watched path
/// - the build command is not blank
/// - `timeout_secs >= 1` and `interval_ms >= 1`
/// - `serve.bind` is an IP address
///
/// It does **not** check that watched files exist; absence is a valid state.
pub fn validate_config(cfg: &ConfigFile) -> Result<(), ConfigError> {
    validate_watch(cfg)?;
    validate_build(cfg)?;
    validate_serve(cfg)?;
    Ok(())
}

fn validate_watch(cfg: &ConfigFile) -> Result<(), ConfigError> {
    if cfg.watch.paths.is_empty() {
        return Err(ConfigError::Invalid(
            "[watch].paths must contain at least one path".to_string(),
        ));
    }
    if cfg.watch.interval_ms == 0 {
        return Err(ConfigError::Invalid(
            "[watch].interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_build(cfg: &ConfigFile) -> Result<(), ConfigError> {
    if cfg.build.cmd.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "[build].cmd must not be empty".to_string(),
        ));
    }
    if cfg.build.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "[build].timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_serve(cfg: &ConfigFile) -> Result<(), ConfigError> {
    cfg.serve.bind.parse::<IpAddr>().map_err(|e| {
        ConfigError::Invalid(format!(
            "[serve].bind '{}' is not an IP address: {e}",
            cfg.serve.bind
        ))
    })?;
    Ok(())
}
