// src/exec/backend.rs

//! Pluggable build backend.
//!
//! The watcher talks to a [`BuildRunner`] instead of spawning processes
//! itself. Production code uses [`CommandRunner`]; tests provide runners
//! that record calls and return canned outcomes.

use std::future::Future;
use std::pin::Pin;

use tracing::info;

use super::command::{BuildCommand, BuildOutcome};

/// Trait abstracting how a single regeneration is carried out.
///
/// Calls are strictly sequential: the watcher awaits each build before it
/// polls again, so implementations never see overlapping calls.
pub trait BuildRunner: Send {
    fn run_build(&mut self) -> Pin<Box<dyn Future<Output = BuildOutcome> + Send + '_>>;
}

/// Runs the configured generator as a subprocess.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    command: BuildCommand,
}

impl CommandRunner {
    pub fn new(command: BuildCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &BuildCommand {
        &self.command
    }
}

impl BuildRunner for CommandRunner {
    fn run_build(&mut self) -> Pin<Box<dyn Future<Output = BuildOutcome> + Send + '_>> {
        let invocation = self.command.invocation();

        Box::pin(async move {
            info!(cmd = %invocation.cmd(), "regenerating artifact");
            invocation.run().await
        })
    }
}
