// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Tracking the last seen modification time of every watched path
//!   (`record.rs`), with missing files as a normal state.
//! - The polling loop that turns stamp changes into rebuilds (`watcher.rs`).
//! - Optional content hashing to ignore timestamp-only changes (`hash.rs`).
//!
//! It does **not** know how a build is performed; it only calls a
//! [`crate::exec::BuildRunner`].

pub mod hash;
pub mod record;
pub mod watcher;

pub use hash::{hash_file, ContentDigests};
pub use record::{FileStamp, ModificationRecord, WatchSet};
pub use watcher::{TickReport, Watcher, WatcherOptions};
