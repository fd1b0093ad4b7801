// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// paths = ["data/AI_benchmarks_2025.csv", "plot_ai_benchmarks.py"]
/// interval_ms = 1000
///
/// [build]
/// cmd = "python3 plot_ai_benchmarks.py"
/// timeout_secs = 30
///
/// [serve]
/// port = 8000
/// artifact = "chart.html"
/// ```
///
/// All sections are optional and have defaults matching the chart workflow
/// this tool was written for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub serve: ServeSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Files to poll, in scan order. Relative paths are resolved against the
    /// project root.
    #[serde(default = "default_watch_paths")]
    pub paths: Vec<PathBuf>,

    /// Poll interval in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Compare content digests before rebuilding on a timestamp change.
    #[serde(default)]
    pub use_hash: bool,
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            paths: default_watch_paths(),
            interval_ms: default_interval_ms(),
            use_hash: false,
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Generator command line, run through the platform shell.
    #[serde(default = "default_cmd")]
    pub cmd: String,

    /// Upper bound on a single build, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            cmd: default_cmd(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `[serve]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServeSection {
    #[serde(default = "default_port")]
    pub port: u16,

    /// IP address to bind; `0.0.0.0` listens on every interface.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Served directory, relative to the project root.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Artifact path under `root`, only used for the startup banner.
    #[serde(default = "default_artifact")]
    pub artifact: String,
}

impl Default for ServeSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
            root: default_root(),
            artifact: default_artifact(),
        }
    }
}

fn default_watch_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("data/AI_benchmarks_2025.csv"),
        PathBuf::from("plot_ai_benchmarks.py"),
    ]
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_cmd() -> String {
    "python3 plot_ai_benchmarks.py".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_port() -> u16 {
    8000
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_artifact() -> String {
    "chart.html".to_string()
}
