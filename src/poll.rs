//! Readiness polling.
//!
//! The store gives no completion signal for an index build, so readiness is
//! observed from the outside: query the index metadata, read the first
//! entry's `status`, compare it to `"READY"`, and repeat at a fixed interval
//! until it matches or the attempt budget runs out.
//!
//! ```text
//! attempt 0 ──query──▶ PENDING
//!   sleep(interval)
//! attempt 1 ──query──▶ BUILDING
//!   sleep(interval)
//! attempt 2 ──query──▶ READY ──▶ Ok(status)
//! ```
//!
//! Every wait races the caller's [`CancellationToken`], so the loop can be
//! abandoned at any suspension point. Running out of attempts is an
//! [`Error::PollTimeout`] unless [`TimeoutPolicy::ReturnLast`] asks for the
//! soft behaviour (hand back the last, non-ready status).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::extract;
use crate::model::{IndexStatus, PollAttempt};
use crate::status::StatusSource;
use crate::{Error, Result};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// What to do when the attempt budget is exhausted without seeing READY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// Fail with [`Error::PollTimeout`].
    #[default]
    Error,
    /// Return the last observed status, ready or not.
    ReturnLast,
}

/// Poll loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Upper bound on status observations.
    pub max_attempts: u32,
    /// Fixed delay between observations. No backoff, no jitter.
    pub interval: Duration,
    /// Query once before the first sleep.
    pub immediate_first_check: bool,
    pub timeout_policy: TimeoutPolicy,
    /// Stop with [`Error::BuildFailed`] as soon as FAILED is observed.
    pub stop_on_failed: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
            immediate_first_check: true,
            timeout_policy: TimeoutPolicy::Error,
            stop_on_failed: true,
        }
    }
}

impl PollConfig {
    /// Sleep before every check, never fail on timeout, and keep polling
    /// through FAILED.
    pub fn soft() -> Self {
        Self {
            immediate_first_check: false,
            timeout_policy: TimeoutPolicy::ReturnLast,
            stop_on_failed: false,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.timeout_policy = policy;
        self
    }

    /// Worst-case wall-clock time spent sleeping. Saturates at `Duration::MAX`.
    pub fn max_wait(&self) -> Duration {
        let sleeps = if self.immediate_first_check {
            self.max_attempts.saturating_sub(1)
        } else {
            self.max_attempts
        };
        self.interval.saturating_mul(sleeps)
    }
}

/// Outcome of a poll loop that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    /// Last observed status.
    pub status: IndexStatus,
    /// Every observation, oldest first.
    pub attempts: Vec<PollAttempt>,
    pub elapsed: Duration,
    /// True when the budget ran out before READY (only with `ReturnLast`).
    pub timed_out: bool,
}

/// Waits for a search index to report READY.
#[derive(Debug, Clone)]
pub struct ReadinessPoller<S> {
    source: S,
    config: PollConfig,
}

impl<S: StatusSource> ReadinessPoller<S> {
    pub fn new(source: S, config: PollConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Poll until READY or the budget is spent. Not cancellable.
    pub async fn wait_until_ready(&self, collection: &str, index_name: &str) -> Result<IndexStatus> {
        self.wait_until_ready_with_cancel(collection, index_name, &CancellationToken::new())
            .await
    }

    /// Poll until READY, the budget is spent, or `cancel` fires.
    pub async fn wait_until_ready_with_cancel(
        &self,
        collection: &str,
        index_name: &str,
        cancel: &CancellationToken,
    ) -> Result<IndexStatus> {
        self.poll(collection, index_name, cancel).await.map(|report| report.status)
    }

    /// Run the poll loop and keep the full observation history.
    pub async fn poll(
        &self,
        collection: &str,
        index_name: &str,
        cancel: &CancellationToken,
    ) -> Result<PollReport> {
        let start = Instant::now();
        let mut attempts: Vec<PollAttempt> = Vec::new();
        let mut last = IndexStatus::unknown(index_name);
        let cancelled = |n: usize| Error::Cancelled {
            index: index_name.to_string(),
            attempts: n as u32,
        };

        for seq in 0..self.config.max_attempts {
            if seq > 0 || !self.config.immediate_first_check {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(cancelled(attempts.len())),
                    _ = tokio::time::sleep(self.config.interval) => {}
                }
            }

            let status = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(attempts.len())),
                status = self.observe(collection, index_name) => status?,
            };

            let elapsed = start.elapsed();
            tracing::debug!(
                collection = collection,
                index = index_name,
                attempt = seq,
                state = %status.state,
                elapsed_ms = elapsed.as_millis() as u64,
                "index status"
            );
            attempts.push(PollAttempt {
                sequence_number: seq,
                observed: status.clone(),
                elapsed_since_start: elapsed,
                observed_at: chrono::Utc::now(),
            });
            last = status;

            if last.is_ready() {
                tracing::info!(
                    collection = collection,
                    index = index_name,
                    attempts = attempts.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "search index ready"
                );
                return Ok(PollReport { status: last, attempts, elapsed, timed_out: false });
            }

            if last.state.is_failed() && self.config.stop_on_failed {
                tracing::warn!(collection = collection, index = index_name, "search index build failed");
                return Err(Error::BuildFailed { index: index_name.to_string() });
            }
        }

        let elapsed = start.elapsed();
        tracing::warn!(
            collection = collection,
            index = index_name,
            attempts = attempts.len(),
            state = %last.state,
            "search index not ready after attempt budget"
        );

        match self.config.timeout_policy {
            TimeoutPolicy::Error => Err(Error::PollTimeout {
                index: index_name.to_string(),
                attempts: attempts.len() as u32,
                last_state: last.state,
            }),
            TimeoutPolicy::ReturnLast => Ok(PollReport { status: last, attempts, elapsed, timed_out: true }),
        }
    }

    /// One status observation. Unparseable metadata counts as `Unknown`.
    async fn observe(&self, collection: &str, index_name: &str) -> Result<IndexStatus> {
        match self.source.list_search_indexes(collection, index_name).await {
            Ok(entries) => Ok(extract::status_of(index_name, entries.first())),
            Err(Error::MalformedStatus(reason)) => {
                tracing::warn!(collection = collection, index = index_name, reason = %reason, "malformed index status");
                Ok(IndexStatus::unknown(index_name))
            }
            Err(e) => Err(e),
        }
    }
}
