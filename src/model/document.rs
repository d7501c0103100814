//! Document — the loosely-typed field map the store returns for each index.

use std::collections::HashMap;
use super::Value;

/// A map of field names to values.
pub type Document = HashMap<String, Value>;

/// Convert a JSON object into a Document. Non-objects yield `None`.
pub fn document_from_json(json: &serde_json::Value) -> Option<Document> {
    match json {
        serde_json::Value::Object(map) => Some(
            map.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect(),
        ),
        _ => None,
    }
}

/// Build a Document from (key, value) pairs.
pub fn document<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Document
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_from_json_object() {
        let doc = document_from_json(&serde_json::json!({"status": "PENDING"})).unwrap();
        assert_eq!(doc.get("status"), Some(&Value::from("PENDING")));
    }

    #[test]
    fn test_document_from_pairs() {
        let doc = document([("name", "name_index"), ("status", "READY")]);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("name"), Some(&Value::from("name_index")));
    }

    #[test]
    fn test_document_from_json_rejects_scalars() {
        assert!(document_from_json(&serde_json::json!("READY")).is_none());
        assert!(document_from_json(&serde_json::json!([1, 2])).is_none());
    }
}
