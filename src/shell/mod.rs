//! # Administrative Shell Channel
//!
//! Index management goes through the store's interactive shell rather than
//! the normal query API. This module owns the contract for that channel:
//!
//! | Type | Module | Description |
//! |------|--------|-------------|
//! | `ShellExecutor` | here | Runs one argv, returns raw output |
//! | `ProcessExecutor` | `process` | Local process or `docker exec` into a container |
//! | `RecordingExecutor` | `recording` | In-memory, records argv and replays canned output |
//!
//! ## Trust boundary
//!
//! Scripts are built by plain string interpolation. Collection names, index
//! names and spec text are embedded unescaped, so anything reaching this
//! layer must come from a trusted source. See [`script`].

pub mod script;
pub mod process;
pub mod recording;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

pub use process::ProcessExecutor;
pub use recording::RecordingExecutor;

// ============================================================================
// Raw command output
// ============================================================================

/// Raw result of one shell invocation. Not interpreted by the provisioner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self { stdout: stdout.into(), stderr: String::new(), exit_code: Some(0) }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self { stdout: String::new(), stderr: stderr.into(), exit_code: Some(exit_code) }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

// ============================================================================
// Credentials + shell invocation
// ============================================================================

/// Username/password passed to the shell binary.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

fn default_binary() -> String {
    "mongosh".into()
}

/// How to invoke the interactive shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    #[serde(default = "default_binary")]
    pub binary: String,
    #[serde(flatten)]
    pub credentials: AdminCredentials,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self { binary: default_binary(), credentials: AdminCredentials::default() }
    }
}

impl ShellConfig {
    pub fn new(credentials: AdminCredentials) -> Self {
        Self { binary: default_binary(), credentials }
    }

    /// `[binary, --username, u, --password, p, --quiet, --eval, script]`
    pub fn argv(&self, script: impl Into<String>) -> Vec<String> {
        vec![
            self.binary.clone(),
            "--username".into(),
            self.credentials.username.clone(),
            "--password".into(),
            self.credentials.password.clone(),
            "--quiet".into(),
            "--eval".into(),
            script.into(),
        ]
    }
}

// ============================================================================
// ShellExecutor trait
// ============================================================================

/// Out-of-band command channel to the store.
///
/// Implementations run the argv once and hand back whatever the process
/// printed. A process that cannot be started is an `Err`; a non-zero exit
/// is reported through [`CommandOutput::exit_code`].
#[async_trait]
pub trait ShellExecutor: Send + Sync {
    async fn exec(&self, argv: &[String]) -> Result<CommandOutput>;
}

#[async_trait]
impl<T: ShellExecutor + ?Sized> ShellExecutor for Arc<T> {
    async fn exec(&self, argv: &[String]) -> Result<CommandOutput> {
        (**self).exec(argv).await
    }
}
