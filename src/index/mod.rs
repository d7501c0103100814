//! Index definitions.
//!
//! An [`IndexDefinition`] names one search index on one collection and carries
//! the raw configuration document the store receives. It is built by the
//! caller, handed to the provisioner once, and never mutated afterwards.

pub mod spec;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub use spec::{IndexSpec, Similarity, VectorField};

/// Kind of search index to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Full-text (Atlas Search) index.
    Text,
    /// Nearest-neighbour (Atlas Vector Search) index.
    Vector,
}

impl IndexKind {
    /// Type argument passed to `createSearchIndex`, if the kind needs one.
    pub fn search_type(&self) -> Option<&'static str> {
        match self {
            IndexKind::Text => None,
            IndexKind::Vector => Some("vectorSearch"),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Text => write!(f, "text"),
            IndexKind::Vector => write!(f, "vector"),
        }
    }
}

impl FromStr for IndexKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "search" => Ok(IndexKind::Text),
            "vector" | "vectorsearch" => Ok(IndexKind::Vector),
            other => Err(Error::Config(format!("unknown index kind '{other}'"))),
        }
    }
}

/// A named index request for one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    pub name: String,
    pub kind: IndexKind,
    pub collection: String,
    pub spec: IndexSpec,
}

impl IndexDefinition {
    pub fn new(
        collection: impl Into<String>,
        name: impl Into<String>,
        kind: IndexKind,
        spec: IndexSpec,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            collection: collection.into(),
            spec,
        }
    }

    pub fn text(collection: impl Into<String>, name: impl Into<String>, spec: IndexSpec) -> Self {
        Self::new(collection, name, IndexKind::Text, spec)
    }

    pub fn vector(collection: impl Into<String>, name: impl Into<String>, spec: IndexSpec) -> Self {
        Self::new(collection, name, IndexKind::Vector, spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_type() {
        assert_eq!(IndexKind::Text.search_type(), None);
        assert_eq!(IndexKind::Vector.search_type(), Some("vectorSearch"));
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("text".parse::<IndexKind>().unwrap(), IndexKind::Text);
        assert_eq!("Vector".parse::<IndexKind>().unwrap(), IndexKind::Vector);
        assert_eq!("vectorSearch".parse::<IndexKind>().unwrap(), IndexKind::Vector);
        assert!("btree".parse::<IndexKind>().is_err());
    }

    #[test]
    fn test_definition_constructors() {
        let def = IndexDefinition::vector("employees", "department_index", IndexSpec::raw("{}"));
        assert_eq!(def.collection, "employees");
        assert_eq!(def.name, "department_index");
        assert_eq!(def.kind, IndexKind::Vector);
    }
}
