// src/errors.rs

//! Crate-wide error types.
//!
//! Library code returns the typed errors below; the binary entry point and
//! [`crate::run`] work with `anyhow` and attach context on the way out.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Problems with the configuration file or the resolved settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading config file at {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing TOML config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while setting up the watcher.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("watch set must contain at least one path")]
    EmptyWatchSet,
}

/// Errors raised by the HTTP server.
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("binding HTTP server to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server failed: {0}")]
    Io(#[from] std::io::Error),
}

pub use anyhow::{Error, Result};
