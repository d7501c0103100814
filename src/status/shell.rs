//! Status queries over the administrative shell.

use async_trait::async_trait;

use super::StatusSource;
use crate::model::{Document, document_from_json};
use crate::shell::{ShellConfig, ShellExecutor, script};
use crate::{Error, Result};

/// Lists search index metadata by running `getSearchIndexes` in the shell
/// and parsing the JSON array it prints.
#[derive(Debug, Clone)]
pub struct ShellStatusSource<E> {
    executor: E,
    shell: ShellConfig,
}

impl<E: ShellExecutor> ShellStatusSource<E> {
    pub fn new(executor: E, shell: ShellConfig) -> Self {
        Self { executor, shell }
    }
}

/// Parse the shell's stdout into metadata documents.
///
/// The shell may print warnings before the payload, so the last non-empty
/// line is taken as the JSON array.
pub fn parse_index_listing(stdout: &str) -> Result<Vec<Document>> {
    let payload = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .next_back()
        .ok_or_else(|| Error::MalformedStatus("empty index listing".into()))?;

    let json: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| Error::MalformedStatus(format!("index listing is not JSON: {e}")))?;

    let serde_json::Value::Array(entries) = json else {
        return Err(Error::MalformedStatus("index listing is not an array".into()));
    };

    entries
        .iter()
        .map(|entry| {
            document_from_json(entry)
                .ok_or_else(|| Error::MalformedStatus("index listing entry is not an object".into()))
        })
        .collect()
}

#[async_trait]
impl<E: ShellExecutor> StatusSource for ShellStatusSource<E> {
    async fn list_search_indexes(&self, collection: &str, name: &str) -> Result<Vec<Document>> {
        let argv = self.shell.argv(script::list_indexes_script(collection, name));
        let out = self.executor.exec(&argv).await?;
        if !out.success() {
            return Err(Error::StatusQuery(format!(
                "listing search indexes for {collection}.{name} exited with {:?}: {}",
                out.exit_code,
                out.stderr.trim()
            )));
        }
        parse_index_listing(&out.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use crate::shell::{AdminCredentials, CommandOutput, RecordingExecutor};

    #[test]
    fn test_parse_listing() {
        let docs = parse_index_listing(
            r#"[{"id":"65f","name":"name_index","status":"BUILDING","queryable":false}]"#,
        )
        .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get("status"), Some(&Value::from("BUILDING")));
    }

    #[test]
    fn test_parse_listing_skips_leading_noise() {
        let stdout = "Warning: something\n\n[]\n";
        assert!(parse_index_listing(stdout).unwrap().is_empty());
    }

    #[test]
    fn test_parse_listing_malformed() {
        assert!(matches!(parse_index_listing(""), Err(Error::MalformedStatus(_))));
        assert!(matches!(parse_index_listing("not json"), Err(Error::MalformedStatus(_))));
        assert!(matches!(parse_index_listing("{}"), Err(Error::MalformedStatus(_))));
        assert!(matches!(parse_index_listing("[1]"), Err(Error::MalformedStatus(_))));
    }

    #[tokio::test]
    async fn test_queries_through_shell() {
        let exec = RecordingExecutor::new();
        exec.push_output(CommandOutput::ok(r#"[{"name":"idx","status":"READY"}]"#));
        let source = ShellStatusSource::new(
            exec.clone(),
            ShellConfig::new(AdminCredentials::new("u", "p")),
        );

        let docs = source.list_search_indexes("employees", "idx").await.unwrap();
        assert_eq!(docs[0].get("status"), Some(&Value::from("READY")));

        let calls = exec.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].last().map(String::as_str),
            Some("JSON.stringify(db.employees.getSearchIndexes('idx'))")
        );
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_query_error() {
        let exec = RecordingExecutor::new();
        exec.push_output(CommandOutput::failed(1, "MongoServerError: auth failed"));
        let source = ShellStatusSource::new(exec, ShellConfig::default());

        let err = source.list_search_indexes("c", "i").await.unwrap_err();
        assert!(matches!(err, Error::StatusQuery(ref m) if m.contains("auth failed")));
    }
}
