//! Index build status as observed from the store.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Literal the store reports once an index is queryable. Compared case-sensitively.
pub const READY_SENTINEL: &str = "READY";

/// Build state of a search index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexState {
    Pending,
    Building,
    Ready,
    /// No matching entry, no `status` field, or a status string we don't know.
    Unknown,
    Failed,
}

impl IndexState {
    /// Map a raw `status` string. Matching is exact: `"ready"` is `Unknown`.
    pub fn from_status(raw: &str) -> Self {
        match raw {
            READY_SENTINEL => IndexState::Ready,
            "PENDING" => IndexState::Pending,
            "BUILDING" => IndexState::Building,
            "FAILED" => IndexState::Failed,
            _ => IndexState::Unknown,
        }
    }

    pub fn is_ready(&self) -> bool { matches!(self, IndexState::Ready) }
    pub fn is_failed(&self) -> bool { matches!(self, IndexState::Failed) }
}

impl fmt::Display for IndexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexState::Pending => write!(f, "PENDING"),
            IndexState::Building => write!(f, "BUILDING"),
            IndexState::Ready => write!(f, "READY"),
            IndexState::Unknown => write!(f, "UNKNOWN"),
            IndexState::Failed => write!(f, "FAILED"),
        }
    }
}

/// One observation of an index's state. The store stays authoritative;
/// a fresh value is produced on every poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStatus {
    pub name: String,
    pub state: IndexState,
    /// The `status` string as returned, when there was one.
    pub raw: Option<String>,
}

impl IndexStatus {
    pub fn new(name: impl Into<String>, state: IndexState) -> Self {
        Self { name: name.into(), state, raw: None }
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, IndexState::Unknown)
    }

    /// Build from the raw `status` field, if any.
    pub fn from_raw(name: impl Into<String>, raw: Option<String>) -> Self {
        let state = raw.as_deref().map_or(IndexState::Unknown, IndexState::from_status);
        Self { name: name.into(), state, raw }
    }

    pub fn is_ready(&self) -> bool { self.state.is_ready() }
}

impl fmt::Display for IndexStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) if self.state == IndexState::Unknown => write!(f, "{}: {} ({raw})", self.name, self.state),
            _ => write!(f, "{}: {}", self.name, self.state),
        }
    }
}

/// A single readiness poll, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollAttempt {
    /// Zero-based.
    pub sequence_number: u32,
    pub observed: IndexStatus,
    pub elapsed_since_start: Duration,
    pub observed_at: DateTime<Utc>,
}
