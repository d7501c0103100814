//! # atlas-index — Search Index Provisioning
//!
//! Creates Atlas Search and Atlas Vector Search indexes through the store's
//! administrative shell and waits until they report `READY`.
//!
//! ## Design Principles
//!
//! 1. **Trait seams**: `ShellExecutor` and `StatusSource` are the only contact
//!    points with the outside world, so every workflow runs against in-memory
//!    doubles as easily as against a live store
//! 2. **Submit, then observe**: provisioning never inspects shell output;
//!    readiness is decided solely by polling index metadata
//! 3. **Explicit outcomes**: timeouts, build failures and cancellation are
//!    distinct errors, never a silently non-ready status
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use atlas_index::{
//!     AdminCredentials, IndexDefinition, IndexSpec, PollConfig, ProcessExecutor,
//!     ProvisioningCoordinator, ShellConfig, Similarity, VectorField,
//! };
//!
//! # async fn example() -> atlas_index::Result<()> {
//! let shell = ShellConfig::new(AdminCredentials::new("mongo_username", "mongo_password"));
//! let coordinator = ProvisioningCoordinator::over_shell(
//!     ProcessExecutor::container("docker", "atlas-local"),
//!     shell,
//!     PollConfig::default(),
//! );
//!
//! let spec = IndexSpec::vector(
//!     &[VectorField::new("embeddings", 384, Similarity::Cosine)],
//!     &[],
//! )?;
//! let def = IndexDefinition::vector("employees", "department_index", spec);
//!
//! let status = coordinator.provision_and_wait(&def).await?;
//! assert!(status.is_ready());
//! # Ok(())
//! # }
//! ```
//!
//! ## Collaborators
//!
//! | Executor | Status source | Use |
//! |----------|---------------|-----|
//! | `ProcessExecutor::local` | `ShellStatusSource` | Shell installed on this host |
//! | `ProcessExecutor::container` | `ShellStatusSource` | Shell inside a container |
//! | `RecordingExecutor` | `ScriptedStatusSource` | Tests and dry runs |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod extract;
pub mod index;
pub mod shell;
pub mod status;
pub mod provision;
pub mod poll;
pub mod coordinator;
pub mod config;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Value, Document, IndexState, IndexStatus, PollAttempt, READY_SENTINEL,
};
pub use index::{IndexDefinition, IndexKind, IndexSpec, Similarity, VectorField};

// ============================================================================
// Re-exports: Shell + status
// ============================================================================

pub use shell::{
    AdminCredentials, CommandOutput, ProcessExecutor, RecordingExecutor,
    ShellConfig, ShellExecutor,
};
pub use status::{ScriptedStatusSource, ShellStatusSource, StatusSource};

// ============================================================================
// Re-exports: Workflow
// ============================================================================

pub use provision::IndexProvisioner;
pub use poll::{PollConfig, PollReport, ReadinessPoller, TimeoutPolicy};
pub use coordinator::ProvisioningCoordinator;
pub use config::{ExecTarget, PollSettings, ProvisionConfig};

pub use tokio_util::sync::CancellationToken;

/// Coordinator that talks to a real shell process for both submit and status.
pub type ShellCoordinator = ProvisioningCoordinator<ProcessExecutor, ShellStatusSource<ProcessExecutor>>;

impl ShellCoordinator {
    /// Build from validated configuration.
    pub fn from_config(config: &ProvisionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::over_shell(
            config.executor(),
            config.shell.clone(),
            config.poll_config(),
        ))
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The administrative command could not be run or exited non-zero.
    #[error("Provisioning index '{index}' failed: {message}")]
    Provision { index: String, message: String },

    /// The attempt budget ran out before the index reported READY.
    #[error("Index '{index}' not ready after {attempts} attempts (last state: {last_state})")]
    PollTimeout { index: String, attempts: u32, last_state: IndexState },

    #[error("Index '{index}' build failed")]
    BuildFailed { index: String },

    #[error("Waiting for index '{index}' cancelled after {attempts} attempts")]
    Cancelled { index: String, attempts: u32 },

    /// Index metadata could not be interpreted. Polling treats this as `Unknown`.
    #[error("Malformed index status: {0}")]
    MalformedStatus(String),

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Status query failed: {0}")]
    StatusQuery(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
