//! # Index Status Sources
//!
//! A `StatusSource` answers one question: which metadata entries does the
//! store currently hold for this index name? The readiness poller only ever
//! looks at the first entry's `status` field.
//!
//! | Source | Module | Description |
//! |--------|--------|-------------|
//! | `ShellStatusSource` | `shell` | `getSearchIndexes` through the admin shell |
//! | `ScriptedStatusSource` | `memory` | Replays a fixed sequence of answers |

pub mod shell;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::model::Document;
use crate::Result;

pub use memory::ScriptedStatusSource;
pub use shell::ShellStatusSource;

/// Side-channel query for search index metadata.
///
/// Returning an empty list is not an error; it means the store has no entry
/// for `name` yet. Implementations should report output they cannot make
/// sense of as [`crate::Error::MalformedStatus`], which the poller tolerates.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn list_search_indexes(&self, collection: &str, name: &str) -> Result<Vec<Document>>;
}

#[async_trait]
impl<T: StatusSource + ?Sized> StatusSource for Arc<T> {
    async fn list_search_indexes(&self, collection: &str, name: &str) -> Result<Vec<Document>> {
        (**self).list_search_indexes(collection, name).await
    }
}
