// src/exec/mod.rs

//! Process execution layer.
//!
//! Runs the artifact generator with `tokio::process::Command` and turns
//! every result, including timeouts and spawn errors, into a
//! [`BuildOutcome`].
//!
//! - [`command`] owns a single invocation: spawn, capture, wait with deadline.
//! - [`backend`] is the seam the watcher issues builds through.

pub mod backend;
pub mod command;

pub use backend::{BuildRunner, CommandRunner};
pub use command::{BuildCommand, BuildInvocation, BuildOutcome};
