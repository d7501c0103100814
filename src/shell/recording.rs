//! In-memory executor.
//!
//! Records every argv it receives and answers from a queue of canned
//! outputs. Once the queue is empty it keeps returning the fallback output.
//! This is the reference implementation used to exercise the provisioner
//! and the shell status source without a live store.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CommandOutput, ShellExecutor};
use crate::{Error, Result};

enum Reply {
    Output(CommandOutput),
    SpawnFailure(String),
}

/// Records calls and replays scripted replies.
#[derive(Clone)]
pub struct RecordingExecutor {
    inner: Arc<RecordingInner>,
}

struct RecordingInner {
    calls: Mutex<Vec<Vec<String>>>,
    replies: Mutex<VecDeque<Reply>>,
    fallback: CommandOutput,
}

impl RecordingExecutor {
    /// Every call succeeds with empty output.
    pub fn new() -> Self {
        Self::with_fallback(CommandOutput::ok(""))
    }

    pub fn with_fallback(fallback: CommandOutput) -> Self {
        Self {
            inner: Arc::new(RecordingInner {
                calls: Mutex::new(Vec::new()),
                replies: Mutex::new(VecDeque::new()),
                fallback,
            }),
        }
    }

    /// Queue an output for the next unanswered call.
    pub fn push_output(&self, output: CommandOutput) -> &Self {
        self.inner.replies.lock().push_back(Reply::Output(output));
        self
    }

    /// Queue a failure to start the process.
    pub fn push_spawn_failure(&self, message: impl Into<String>) -> &Self {
        self.inner.replies.lock().push_back(Reply::SpawnFailure(message.into()));
        self
    }

    /// All argvs received so far, oldest first.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.inner.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.calls.lock().len()
    }
}

impl Default for RecordingExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecordingExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingExecutor")
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl ShellExecutor for RecordingExecutor {
    async fn exec(&self, argv: &[String]) -> Result<CommandOutput> {
        self.inner.calls.lock().push(argv.to_vec());
        let reply = self.inner.replies.lock().pop_front();
        match reply {
            Some(Reply::Output(out)) => Ok(out),
            Some(Reply::SpawnFailure(msg)) => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                msg,
            ))),
            None => Ok(self.inner.fallback.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_and_replays() {
        let exec = RecordingExecutor::new();
        exec.push_output(CommandOutput::ok("first"));

        let a = exec.exec(&["x".to_string()]).await.unwrap();
        let b = exec.exec(&["y".to_string()]).await.unwrap();

        assert_eq!(a.stdout, "first");
        assert_eq!(b.stdout, "");
        assert_eq!(exec.calls(), vec![vec!["x".to_string()], vec!["y".to_string()]]);
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let exec = RecordingExecutor::new();
        exec.push_spawn_failure("mongosh: not found");
        assert!(matches!(exec.exec(&[]).await, Err(Error::Io(_))));
        assert_eq!(exec.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fallback_repeats_after_queue() {
        let exec = RecordingExecutor::with_fallback(CommandOutput::ok("[]"));
        exec.push_output(CommandOutput::ok("queued"));

        assert_eq!(exec.exec(&[]).await.unwrap().stdout, "queued");
        assert_eq!(exec.exec(&[]).await.unwrap().stdout, "[]");
        assert_eq!(exec.exec(&[]).await.unwrap().stdout, "[]");
    }

    #[tokio::test]
    async fn test_clones_share_history() {
        let exec = RecordingExecutor::new();
        let other = exec.clone();
        other.exec(&["z".to_string()]).await.unwrap();
        assert_eq!(exec.call_count(), 1);
    }
}
