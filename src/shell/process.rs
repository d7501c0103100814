//! Process-backed executor.
//!
//! Runs the shell binary as a child process, either directly on this host or
//! inside a running container through `<runtime> exec <name>`. An optional
//! per-call timeout bounds a shell that never exits (for example one stuck
//! connecting); the child is killed when the timeout fires.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::{CommandOutput, ShellExecutor, script};
use crate::{Error, Result};

/// Spawns the argv (optionally behind a container exec prefix) and collects its output.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    prefix: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    /// Run the shell binary on this host.
    pub fn local() -> Self {
        Self { prefix: Vec::new(), timeout: None }
    }

    /// Run the shell binary inside `container` via `<runtime> exec`.
    pub fn container(runtime: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            prefix: vec![runtime.into(), "exec".into(), container.into()],
            timeout: None,
        }
    }

    /// Fail a call with `ErrorKind::TimedOut` once it has run for `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Full argv that will be spawned for `argv`.
    pub fn command_line(&self, argv: &[String]) -> Vec<String> {
        self.prefix.iter().chain(argv.iter()).cloned().collect()
    }
}

#[async_trait]
impl ShellExecutor for ProcessExecutor {
    async fn exec(&self, argv: &[String]) -> Result<CommandOutput> {
        let full = self.command_line(argv);
        let Some((program, args)) = full.split_first() else {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "empty command line",
            )));
        };

        tracing::debug!(argv = ?script::redact(&full), "spawning shell");

        let child = Command::new(program).args(args).kill_on_drop(true).output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child).await.map_err(|_| {
                tracing::warn!(program = %program, timeout_ms = limit.as_millis() as u64, "shell timed out");
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("{program} did not exit within {}ms", limit.as_millis()),
                ))
            })??,
            None => child.await?,
        };

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}
