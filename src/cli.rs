// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every flag here is optional and overrides the matching value from the
//! config file (see [`crate::config::Settings::resolve`]).

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watchserve`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "watchserve",
    version,
    about = "Rebuild an artifact when its inputs change and serve it over HTTP.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Watchserve.toml` in the current working directory. A missing
    /// default file is fine; a missing explicit file is an error.
    ///
    /// Watched paths, the served root and the build directory are resolved
    /// against the directory holding this file. Without `--config` that is
    /// the current working directory, which is also where the default file
    /// is looked up.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// TCP port for the HTTP server.
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Address to bind the HTTP server to.
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Directory served over HTTP (relative to the project root).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Generator command, run through the platform shell.
    #[arg(long, value_name = "CMD")]
    pub cmd: Option<String>,

    /// File to watch. Repeat to watch several; replaces the configured list.
    #[arg(long = "watch", value_name = "PATH")]
    pub watch: Vec<PathBuf>,

    /// Build timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Poll interval in milliseconds.
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Artifact path (relative to the served root) announced at startup.
    #[arg(long, value_name = "PATH")]
    pub artifact: Option<String>,

    /// Skip rebuilds when a file's timestamp moves but its content is unchanged.
    #[arg(long)]
    pub use_hash: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHSERVE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the configuration, then exit without building.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
