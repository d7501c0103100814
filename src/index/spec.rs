//! Raw index configuration documents.
//!
//! The store takes the configuration as a shell literal, so an [`IndexSpec`]
//! is kept as text and embedded into the administrative script byte-for-byte.
//! The builders here only produce that text; nothing downstream re-encodes it.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Verbatim index configuration text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexSpec(String);

impl IndexSpec {
    /// Wrap literal configuration text. No validation or escaping.
    pub fn raw(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Read the configuration document from a file, verbatim.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(Self(text))
    }

    /// `{"mappings":{"dynamic":true}}` — index every field of the collection.
    pub fn dynamic_text() -> Self {
        Self(serde_json::json!({ "mappings": { "dynamic": true } }).to_string())
    }

    /// Render a vector search definition with optional filter paths.
    pub fn vector(fields: &[VectorField], filters: &[&str]) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::Config("vector index needs at least one vector field".into()));
        }
        let mut entries = Vec::with_capacity(fields.len() + filters.len());
        for field in fields {
            if field.num_dimensions == 0 {
                return Err(Error::Config(format!(
                    "vector field '{}' must have numDimensions > 0",
                    field.path
                )));
            }
            entries.push(serde_json::to_value(field)?);
        }
        for path in filters {
            entries.push(serde_json::json!({ "type": "filter", "path": path }));
        }
        Ok(Self(serde_json::json!({ "fields": entries }).to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Vector similarity function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Similarity {
    Cosine,
    Euclidean,
    DotProduct,
}

/// One embedding field of a vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorField {
    /// Always `"vector"`.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Document field holding the embedding.
    pub path: String,
    pub num_dimensions: u32,
    pub similarity: Similarity,
}

impl VectorField {
    pub fn new(path: impl Into<String>, num_dimensions: u32, similarity: Similarity) -> Self {
        Self {
            field_type: "vector".into(),
            path: path.into(),
            num_dimensions,
            similarity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_vector_spec_shape() {
        let spec = IndexSpec::vector(
            &[VectorField::new("embeddings", 384, Similarity::Cosine)],
            &["department"],
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(spec.as_str()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fields": [
                    {"type": "vector", "path": "embeddings", "numDimensions": 384, "similarity": "cosine"},
                    {"type": "filter", "path": "department"},
                ]
            })
        );
    }

    #[test]
    fn test_vector_spec_rejects_zero_dimensions() {
        let err = IndexSpec::vector(&[VectorField::new("e", 0, Similarity::Euclidean)], &[]);
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn test_vector_spec_rejects_empty() {
        assert!(IndexSpec::vector(&[], &[]).is_err());
    }

    #[test]
    fn test_similarity_names() {
        assert_eq!(serde_json::to_string(&Similarity::DotProduct).unwrap(), "\"dotProduct\"");
        assert_eq!(serde_json::to_string(&Similarity::Euclidean).unwrap(), "\"euclidean\"");
    }

    #[test]
    fn test_dynamic_text() {
        assert_eq!(IndexSpec::dynamic_text().as_str(), r#"{"mappings":{"dynamic":true}}"#);
    }

    #[test]
    fn test_from_file_is_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("text.json");
        let body = "{\n  mappings: { dynamic: true, fields: { name: { type: 'string' } } }\n}\n";
        std::fs::write(&path, body).unwrap();
        assert_eq!(IndexSpec::from_file(&path).unwrap().as_str(), body);
    }
}
