// src/config/settings.rs

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;
use crate::errors::ConfigError;

/// Fully resolved runtime settings: config file + CLI overrides, with every
/// path made absolute against the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub project_root: PathBuf,
    pub watch_paths: Vec<PathBuf>,
    pub poll_interval: Duration,
    pub use_hash: bool,
    pub cmd: String,
    pub build_timeout: Duration,
    pub addr: SocketAddr,
    pub serve_root: PathBuf,
    pub artifact: String,
}

impl Settings {
    /// Merge CLI overrides into `cfg`, validate the result and resolve paths.
    pub fn resolve(cfg: ConfigFile, args: &CliArgs) -> Result<Self, ConfigError> {
        let cfg = apply_overrides(cfg, args);
        validate_config(&cfg)?;

        let project_root = project_root_dir(args.config.as_deref());
        Self::from_config(&cfg, &project_root)
    }

    /// Resolve an already-validated config against `project_root`.
    pub fn from_config(cfg: &ConfigFile, project_root: &Path) -> Result<Self, ConfigError> {
        let ip: IpAddr = cfg.serve.bind.parse().map_err(|e| {
            ConfigError::Invalid(format!("[serve].bind '{}': {e}", cfg.serve.bind))
        })?;

        Ok(Self {
            project_root: project_root.to_path_buf(),
            watch_paths: cfg
                .watch
                .paths
                .iter()
                .map(|p| project_root.join(p))
                .collect(),
            poll_interval: Duration::from_millis(cfg.watch.interval_ms),
            use_hash: cfg.watch.use_hash,
            cmd: cfg.build.cmd.clone(),
            build_timeout: Duration::from_secs(cfg.build.timeout_secs),
            addr: SocketAddr::new(ip, cfg.serve.port),
            serve_root: project_root.join(&cfg.serve.root),
            artifact: cfg.serve.artifact.trim_start_matches('/').to_string(),
        })
    }

    /// URL a browser should open to see the artifact.
    pub fn artifact_url(&self, port: u16) -> String {
        let host = if self.addr.ip().is_unspecified() {
            "localhost".to_string()
        } else {
            self.addr.ip().to_string()
        };
        format!("http://{host}:{port}/{}", self.artifact)
    }
}

fn apply_overrides(mut cfg: ConfigFile, args: &CliArgs) -> ConfigFile {
    if !args.watch.is_empty() {
        cfg.watch.paths = args.watch.clone();
    }
    if let Some(ms) = args.interval_ms {
        cfg.watch.interval_ms = ms;
    }
    if args.use_hash {
        cfg.watch.use_hash = true;
    }
    if let Some(ref cmd) = args.cmd {
        cfg.build.cmd = cmd.clone();
    }
    if let Some(secs) = args.timeout {
        cfg.build.timeout_secs = secs;
    }
    if let Some(port) = args.port {
        cfg.serve.port = port;
    }
    if let Some(ref bind) = args.bind {
        cfg.serve.bind = bind.clone();
    }
    if let Some(ref root) = args.root {
        cfg.serve.root = root.clone();
    }
    if let Some(ref artifact) = args.artifact {
        cfg.serve.artifact = artifact.clone();
    }
    cfg
}

/// Figure out the project root that relative paths are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "charts/Watchserve.toml"),
///   we use that directory.
/// - Otherwise we fall back to the current working directory, which is the
///   directory of the default `Watchserve.toml` when that file is used.
pub fn project_root_dir(config_path: Option<&Path>) -> PathBuf {
    let cwd = || std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match config_path.and_then(Path::parent) {
        Some(parent) if !parent.as_os_str().is_empty() => {
            let parent = parent.to_path_buf();
            if parent.is_absolute() {
                parent
            } else {
                cwd().join(parent)
            }
        }
        _ => cwd(),
    }
}
