// src/config/mod.rs

//! Configuration loading and validation for watchserve.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants (`validate.rs`).
//! - Merge CLI overrides and resolve paths (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_optional};
pub use model::{BuildSection, ConfigFile, ServeSection, WatchSection};
pub use settings::{project_root_dir, Settings};
pub use validate::validate_config;
