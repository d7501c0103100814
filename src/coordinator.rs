//! Create-and-wait coordination.
//!
//! One entry point for every call site that needs an index to exist and be
//! queryable before moving on. Submission and polling run strictly in order:
//! the first status query happens only after `submit` has returned.

use tokio_util::sync::CancellationToken;

use crate::index::IndexDefinition;
use crate::model::IndexStatus;
use crate::poll::{PollConfig, PollReport, ReadinessPoller};
use crate::provision::IndexProvisioner;
use crate::shell::{ShellConfig, ShellExecutor};
use crate::status::{ShellStatusSource, StatusSource};
use crate::Result;

/// Sequences [`IndexProvisioner::submit`] and [`ReadinessPoller::poll`].
#[derive(Debug, Clone)]
pub struct ProvisioningCoordinator<E, S> {
    provisioner: IndexProvisioner<E>,
    poller: ReadinessPoller<S>,
}

impl<E: ShellExecutor, S: StatusSource> ProvisioningCoordinator<E, S> {
    pub fn new(provisioner: IndexProvisioner<E>, poller: ReadinessPoller<S>) -> Self {
        Self { provisioner, poller }
    }

    /// Submit `definition`, then block until the index is READY.
    ///
    /// Suspends for at most [`PollConfig::max_wait`] plus query time.
    pub async fn provision_and_wait(&self, definition: &IndexDefinition) -> Result<IndexStatus> {
        self.provision_and_wait_with_cancel(definition, &CancellationToken::new())
            .await
            .map(|report| report.status)
    }

    /// Like [`Self::provision_and_wait`], abandoning the wait when `cancel` fires.
    ///
    /// Cancellation only interrupts polling; a submitted command is never
    /// rolled back.
    pub async fn provision_and_wait_with_cancel(
        &self,
        definition: &IndexDefinition,
        cancel: &CancellationToken,
    ) -> Result<PollReport> {
        self.provisioner.submit(definition).await?;
        self.poller
            .poll(&definition.collection, &definition.name, cancel)
            .await
    }

    /// Provision each definition in order, waiting for each before the next.
    ///
    /// Stops at the first error; earlier indexes stay provisioned.
    pub async fn provision_all(
        &self,
        definitions: &[IndexDefinition],
        cancel: &CancellationToken,
    ) -> Result<Vec<IndexStatus>> {
        let mut statuses = Vec::with_capacity(definitions.len());
        for def in definitions {
            let report = self.provision_and_wait_with_cancel(def, cancel).await?;
            statuses.push(report.status);
        }
        Ok(statuses)
    }

    pub fn provisioner(&self) -> &IndexProvisioner<E> {
        &self.provisioner
    }

    pub fn poller(&self) -> &ReadinessPoller<S> {
        &self.poller
    }
}

/// Coordinator whose status queries go through the same shell as provisioning.
impl<E: ShellExecutor + Clone> ProvisioningCoordinator<E, ShellStatusSource<E>> {
    pub fn over_shell(executor: E, shell: ShellConfig, poll: PollConfig) -> Self {
        let source = ShellStatusSource::new(executor.clone(), shell.clone());
        Self::new(
            IndexProvisioner::new(executor, shell),
            ReadinessPoller::new(source, poll),
        )
    }
}
