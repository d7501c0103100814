//! In-memory status source.
//!
//! Answers each query with the next scripted response. When the script runs
//! out, the last response repeats, so a source built from `[PENDING, READY]`
//! stays READY for as long as it is asked. This is the reference
//! implementation used to drive the readiness poller in tests and demos.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::StatusSource;
use crate::model::{Document, document};
use crate::{Error, Result};

#[derive(Clone)]
enum Response {
    Entries(Vec<Document>),
    Malformed(String),
    QueryFailure(String),
}

/// Replays a fixed sequence of metadata listings.
#[derive(Clone)]
pub struct ScriptedStatusSource {
    inner: Arc<ScriptedInner>,
}

struct ScriptedInner {
    queue: Mutex<VecDeque<Response>>,
    last: Mutex<Option<Response>>,
    queries: Mutex<Vec<(String, String)>>,
}

impl ScriptedStatusSource {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ScriptedInner {
                queue: Mutex::new(VecDeque::new()),
                last: Mutex::new(None),
                queries: Mutex::new(Vec::new()),
            }),
        }
    }

    /// One single-entry listing per state string, e.g. `["PENDING", "READY"]`.
    pub fn from_states<S: AsRef<str>>(states: impl IntoIterator<Item = S>) -> Self {
        let source = Self::new();
        for state in states {
            source.push_state(state.as_ref());
        }
        source
    }

    /// Queue a listing with one entry whose `status` is `state`.
    pub fn push_state(&self, state: &str) -> &Self {
        self.push_entries(vec![document([("status", state)])])
    }

    /// Queue an arbitrary listing (possibly empty).
    pub fn push_entries(&self, entries: Vec<Document>) -> &Self {
        self.inner.queue.lock().push_back(Response::Entries(entries));
        self
    }

    /// Queue a response the source cannot parse.
    pub fn push_malformed(&self, message: impl Into<String>) -> &Self {
        self.inner.queue.lock().push_back(Response::Malformed(message.into()));
        self
    }

    /// Queue a failed query.
    pub fn push_query_failure(&self, message: impl Into<String>) -> &Self {
        self.inner.queue.lock().push_back(Response::QueryFailure(message.into()));
        self
    }

    /// `(collection, name)` of every query received, oldest first.
    pub fn queries(&self) -> Vec<(String, String)> {
        self.inner.queries.lock().clone()
    }

    pub fn query_count(&self) -> usize {
        self.inner.queries.lock().len()
    }

    fn next_response(&self) -> Option<Response> {
        let next = self.inner.queue.lock().pop_front();
        let mut last = self.inner.last.lock();
        match next {
            Some(resp) => {
                *last = Some(resp.clone());
                Some(resp)
            }
            None => last.clone(),
        }
    }
}

impl Default for ScriptedStatusSource {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScriptedStatusSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedStatusSource")
            .field("queued", &self.inner.queue.lock().len())
            .field("queries", &self.query_count())
            .finish()
    }
}

#[async_trait]
impl StatusSource for ScriptedStatusSource {
    async fn list_search_indexes(&self, collection: &str, name: &str) -> Result<Vec<Document>> {
        self.inner.queries.lock().push((collection.to_string(), name.to_string()));
        match self.next_response() {
            None => Ok(Vec::new()),
            Some(Response::Entries(mut entries)) => {
                for entry in &mut entries {
                    entry.entry("name".to_string()).or_insert_with(|| name.into());
                }
                Ok(entries)
            }
            Some(Response::Malformed(msg)) => Err(Error::MalformedStatus(msg)),
            Some(Response::QueryFailure(msg)) => Err(Error::StatusQuery(msg)),
        }
    }
}
