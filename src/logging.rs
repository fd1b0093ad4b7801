// src/logging.rs

//! Logging setup for `watchserve` using `tracing` + `tracing-subscriber`.
//!
//! The filter comes from, in order:
//! 1. `--log-level` CLI flag (a single level for everything)
//! 2. `WATCHSERVE_LOG`, in `EnvFilter` directive syntax
//!    (e.g. `debug` or `watchserve=debug,tower_http=trace`)
//! 3. `info`
//!
//! An unparsable `WATCHSERVE_LOG` falls back to `info` rather than aborting.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "WATCHSERVE_LOG";

/// Initialise global logging subscriber on stderr.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV).ok());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn build_filter(cli_level: Option<LogLevel>, env_directives: Option<String>) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return EnvFilter::new(level_directive(lvl));
    }

    env_directives
        .and_then(|d| EnvFilter::try_new(d.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn level_directive(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
