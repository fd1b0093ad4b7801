// src/exec/command.rs

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, error, info, warn};

/// How to run the artifact generator: a shell command line, the directory to
/// run it in and an upper bound on its runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    pub cmd: String,
    pub cwd: PathBuf,
    pub timeout: Duration,
}

impl BuildCommand {
    pub fn new(cmd: impl Into<String>, cwd: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            cmd: cmd.into(),
            cwd: cwd.into(),
            timeout,
        }
    }

    /// Create a fresh invocation for one regeneration attempt.
    pub fn invocation(&self) -> BuildInvocation {
        BuildInvocation {
            cmd: self.cmd.clone(),
            cwd: self.cwd.clone(),
            timeout: self.timeout,
        }
    }
}

/// One regeneration attempt. Consumed by [`BuildInvocation::run`].
#[derive(Debug, Clone)]
pub struct BuildInvocation {
    cmd: String,
    cwd: PathBuf,
    timeout: Duration,
}

/// Captured result of a [`BuildInvocation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Succeeded {
        stdout: String,
        stderr: String,
        elapsed: Duration,
    },
    /// Process ran to completion with a non-zero (or signal) exit status.
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    TimedOut {
        timeout: Duration,
    },
    /// Process could not be spawned or waited on.
    SpawnFailed {
        error: String,
    },
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Succeeded { .. })
    }

    /// Emit the console line for this outcome.
    pub fn report(&self) {
        match self {
            BuildOutcome::Succeeded { stdout, .. } => {
                if !stdout.trim().is_empty() {
                    debug!("generator stdout:\n{}", stdout.trim_end());
                }
                info!("{}", self);
            }
            BuildOutcome::Failed { .. } => warn!("{}", self),
            BuildOutcome::TimedOut { .. } | BuildOutcome::SpawnFailed { .. } => error!("{}", self),
        }
    }
}

impl fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildOutcome::Succeeded { elapsed, .. } => {
                write!(f, "artifact regenerated successfully in {elapsed:.2?}")
            }
            BuildOutcome::Failed { code, stderr, .. } => {
                match code {
                    Some(code) => write!(f, "error regenerating artifact (exit code {code})")?,
                    None => write!(f, "error regenerating artifact (terminated by signal)")?,
                }
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, ":\n{stderr}")?;
                }
                Ok(())
            }
            BuildOutcome::TimedOut { timeout } => {
                write!(f, "error regenerating artifact: timed out after {timeout:?}")
            }
            BuildOutcome::SpawnFailed { error } => {
                write!(f, "error regenerating artifact: {error}")
            }
        }
    }
}

impl BuildInvocation {
    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    /// Spawn the generator, capture stdout/stderr and wait up to the timeout.
    ///
    /// Never returns an error: every failure mode is folded into the outcome.
    /// On timeout the child is dropped, which kills it (`kill_on_drop`).
    pub async fn run(self) -> BuildOutcome {
        debug!(cmd = %self.cmd, cwd = ?self.cwd, timeout = ?self.timeout, "spawning generator");
        let started = Instant::now();

        let mut cmd = shell_command(&self.cmd);
        cmd.current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                return BuildOutcome::SpawnFailed {
                    error: format!("spawning '{}' in {:?}: {err}", self.cmd, self.cwd),
                };
            }
        };

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                return BuildOutcome::SpawnFailed {
                    error: format!("waiting for '{}': {err}", self.cmd),
                };
            }
            Err(_) => {
                return BuildOutcome::TimedOut {
                    timeout: self.timeout,
                };
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        debug!(
            cmd = %self.cmd,
            exit_code = ?output.status.code(),
            success = output.status.success(),
            "generator exited"
        );

        if output.status.success() {
            BuildOutcome::Succeeded {
                stdout,
                stderr,
                elapsed: started.elapsed(),
            }
        } else {
            BuildOutcome::Failed {
                code: output.status.code(),
                stdout,
                stderr,
            }
        }
    }
}

/// Build a shell command appropriate for the platform.
fn shell_command(line: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(line);
        c
    }
}
