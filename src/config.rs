//! Configuration.
//!
//! All settings are plain values passed into constructors. A config file is
//! optional JSON with every field defaulted; environment variables override
//! the file.
//!
//! ```json
//! {
//!   "shell": { "binary": "mongosh", "username": "mongo_username", "password": "mongo_password" },
//!   "target": { "container": { "runtime": "docker", "name": "atlas-local" } },
//!   "poll": { "max_attempts": 60, "interval_ms": 500, "timeout_policy": "error" },
//!   "command_timeout_ms": 30000
//! }
//! ```
//!
//! Precedence, lowest first: defaults, file, `ATLAS_INDEX_*`, then explicit
//! setters such as [`ProvisionConfig::with_container`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::poll::{DEFAULT_INTERVAL, DEFAULT_MAX_ATTEMPTS, PollConfig, TimeoutPolicy};
use crate::shell::{ProcessExecutor, ShellConfig};
use crate::{Error, Result};

pub const ENV_SHELL: &str = "ATLAS_INDEX_SHELL";
pub const ENV_USERNAME: &str = "ATLAS_INDEX_USERNAME";
pub const ENV_PASSWORD: &str = "ATLAS_INDEX_PASSWORD";
pub const ENV_CONTAINER: &str = "ATLAS_INDEX_CONTAINER";
pub const ENV_MAX_ATTEMPTS: &str = "ATLAS_INDEX_MAX_ATTEMPTS";
pub const ENV_INTERVAL_MS: &str = "ATLAS_INDEX_INTERVAL_MS";
pub const ENV_COMMAND_TIMEOUT_MS: &str = "ATLAS_INDEX_COMMAND_TIMEOUT_MS";

pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

fn default_runtime() -> String {
    "docker".into()
}

/// Where the shell binary runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecTarget {
    /// Directly on this host.
    #[default]
    Local,
    /// Inside a running container via `<runtime> exec <name>`.
    Container {
        #[serde(default = "default_runtime")]
        runtime: String,
        name: String,
    },
}

impl ExecTarget {
    pub fn executor(&self) -> ProcessExecutor {
        match self {
            ExecTarget::Local => ProcessExecutor::local(),
            ExecTarget::Container { runtime, name } => ProcessExecutor::container(runtime, name),
        }
    }
}

/// Serializable form of [`PollConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub interval_ms: u64,
    pub immediate_first_check: bool,
    pub timeout_policy: TimeoutPolicy,
    pub stop_on_failed: bool,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval_ms: DEFAULT_INTERVAL.as_millis() as u64,
            immediate_first_check: true,
            timeout_policy: TimeoutPolicy::Error,
            stop_on_failed: true,
        }
    }
}

impl From<&PollSettings> for PollConfig {
    fn from(s: &PollSettings) -> Self {
        PollConfig {
            max_attempts: s.max_attempts,
            interval: Duration::from_millis(s.interval_ms),
            immediate_first_check: s.immediate_first_check,
            timeout_policy: s.timeout_policy,
            stop_on_failed: s.stop_on_failed,
        }
    }
}

/// Everything needed to build a coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    pub shell: ShellConfig,
    pub target: ExecTarget,
    pub poll: PollSettings,
    /// Upper bound on one shell invocation. `null` means unbounded.
    pub command_timeout_ms: Option<u64>,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            shell: ShellConfig::default(),
            target: ExecTarget::default(),
            poll: PollSettings::default(),
            command_timeout_ms: Some(DEFAULT_COMMAND_TIMEOUT.as_millis() as u64),
        }
    }
}

impl ProvisionConfig {
    /// Parse a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Apply `ATLAS_INDEX_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(binary) = lookup(ENV_SHELL) {
            self.shell.binary = binary;
        }
        if let Some(username) = lookup(ENV_USERNAME) {
            self.shell.credentials.username = username;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.shell.credentials.password = password;
        }
        if let Some(name) = lookup(ENV_CONTAINER) {
            self = self.with_container(name);
        }
        if let Some(raw) = lookup(ENV_MAX_ATTEMPTS) {
            self.poll.max_attempts = parse_number(ENV_MAX_ATTEMPTS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_INTERVAL_MS) {
            self.poll.interval_ms = parse_number(ENV_INTERVAL_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_COMMAND_TIMEOUT_MS) {
            self.command_timeout_ms = Some(parse_number(ENV_COMMAND_TIMEOUT_MS, &raw)?);
        }
        Ok(self)
    }

    /// Run the shell inside container `name`. A runtime already configured
    /// for a container target is kept; otherwise `docker` is used.
    pub fn with_container(mut self, name: impl Into<String>) -> Self {
        let runtime = match self.target {
            ExecTarget::Container { runtime, .. } => runtime,
            ExecTarget::Local => default_runtime(),
        };
        self.target = ExecTarget::Container { runtime, name: name.into() };
        self
    }

    /// Reject settings that cannot produce a meaningful wait.
    pub fn validate(&self) -> Result<()> {
        if self.shell.binary.trim().is_empty() {
            return Err(Error::Config("shell binary must not be empty".into()));
        }
        if self.poll.max_attempts == 0 {
            return Err(Error::Config("poll.max_attempts must be at least 1".into()));
        }
        if self.command_timeout_ms == Some(0) {
            return Err(Error::Config("command_timeout_ms must be at least 1".into()));
        }
        if let ExecTarget::Container { name, .. } = &self.target {
            if name.trim().is_empty() {
                return Err(Error::Config("container name must not be empty".into()));
            }
        }
        Ok(())
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig::from(&self.poll)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_ms.map(Duration::from_millis)
    }

    /// Executor for the configured target, bounded by the command timeout.
    pub fn executor(&self) -> ProcessExecutor {
        self.target.executor().with_timeout(self.command_timeout())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key}: '{raw}' is not a valid number")))
}
