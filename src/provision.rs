//! Index provisioning.
//!
//! Submits one `createSearchIndex` call per [`IndexDefinition`] through the
//! administrative shell. The store builds the index asynchronously, so a
//! successful submit only means the request was accepted for execution;
//! use [`crate::poll::ReadinessPoller`] to learn when the index is usable.
//!
//! ## Limitations
//!
//! - **No escaping**: the collection name, index name and spec text are
//!   interpolated into the script verbatim. A quote in any of them changes
//!   the script. Treat everything passed in as trusted administrative input.
//! - **No output parsing**: stdout/stderr come back raw and are only logged.
//!   Only a failure to run the shell or a non-zero exit is reported.
//! - **No retries**: a failed submit is returned to the caller as-is.

use crate::index::IndexDefinition;
use crate::shell::{CommandOutput, ShellConfig, ShellExecutor, script};
use crate::{Error, Result};

/// Builds and submits index creation commands.
#[derive(Debug, Clone)]
pub struct IndexProvisioner<E> {
    executor: E,
    shell: ShellConfig,
}

impl<E: ShellExecutor> IndexProvisioner<E> {
    pub fn new(executor: E, shell: ShellConfig) -> Self {
        Self { executor, shell }
    }

    /// The exact argv `submit` would run for `definition`.
    pub fn command(&self, definition: &IndexDefinition) -> Vec<String> {
        self.shell.argv(script::create_index_script(definition))
    }

    /// Send one creation command and return the shell's raw output.
    pub async fn submit(&self, definition: &IndexDefinition) -> Result<CommandOutput> {
        let argv = self.command(definition);

        tracing::info!(
            collection = %definition.collection,
            index = %definition.name,
            kind = %definition.kind,
            "submitting search index"
        );

        let output = self.executor.exec(&argv).await.map_err(|e| Error::Provision {
            index: definition.name.clone(),
            message: format!("could not run {}: {e}", self.shell.binary),
        })?;

        tracing::debug!(index = %definition.name, stdout = %output.stdout.trim_end(), "shell stdout");
        if !output.stderr.trim().is_empty() {
            tracing::debug!(index = %definition.name, stderr = %output.stderr.trim_end(), "shell stderr");
        }

        if !output.success() {
            return Err(Error::Provision {
                index: definition.name.clone(),
                message: format!(
                    "{} exited with {}: {}",
                    self.shell.binary,
                    output.exit_code.map_or_else(|| "signal".to_string(), |c| c.to_string()),
                    output.stderr.trim()
                ),
            });
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexSpec;
    use crate::shell::{AdminCredentials, RecordingExecutor};

    fn provisioner(exec: &RecordingExecutor) -> IndexProvisioner<RecordingExecutor> {
        IndexProvisioner::new(exec.clone(), ShellConfig::new(AdminCredentials::new("u", "p")))
    }

    #[tokio::test]
    async fn test_submit_sends_one_command() {
        let exec = RecordingExecutor::new();
        let def = IndexDefinition::text("employees", "name_index", IndexSpec::dynamic_text());

        provisioner(&exec).submit(&def).await.unwrap();

        assert_eq!(exec.call_count(), 1);
        assert_eq!(exec.calls()[0], provisioner(&exec).command(&def));
    }

    #[tokio::test]
    async fn test_submit_returns_raw_output_unparsed() {
        let exec = RecordingExecutor::new();
        exec.push_output(CommandOutput {
            stdout: "name_index\n".into(),
            stderr: "some warning\n".into(),
            exit_code: Some(0),
        });
        let def = IndexDefinition::text("employees", "name_index", IndexSpec::dynamic_text());

        let out = provisioner(&exec).submit(&def).await.unwrap();
        assert_eq!(out.stdout, "name_index\n");
        assert_eq!(out.stderr, "some warning\n");
    }

    #[tokio::test]
    async fn test_spawn_failure_is_provision_error() {
        let exec = RecordingExecutor::new();
        exec.push_spawn_failure("mongosh: not found");
        let def = IndexDefinition::text("c", "idx", IndexSpec::raw("{}"));

        let err = provisioner(&exec).submit(&def).await.unwrap_err();
        assert!(matches!(err, Error::Provision { ref index, .. } if index == "idx"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_provision_error_and_not_retried() {
        let exec = RecordingExecutor::new();
        exec.push_output(CommandOutput::failed(1, "MongoServerError: Duplicate Index"));
        let def = IndexDefinition::vector("c", "idx", IndexSpec::raw("{}"));

        let err = provisioner(&exec).submit(&def).await.unwrap_err();
        assert!(err.to_string().contains("Duplicate Index"));
        assert_eq!(exec.call_count(), 1);
    }
}
