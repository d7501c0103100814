//! Tolerant field access over status documents.
//!
//! A missing field is never an error: [`field`] returns `Ok(None)`. A field
//! that is present but cannot be coerced into the requested type is a
//! [`Error::TypeError`], since it means the caller declared the wrong type.

use crate::model::{Document, IndexStatus, Value};
use crate::{Error, Result};

/// Convert from Value to concrete types.
pub trait FromValue: Sized {
    fn from_value(val: &Value) -> Result<Self>;
}

fn type_error(expected: &str, val: &Value) -> Error {
    Error::TypeError {
        expected: expected.into(),
        got: val.type_name().into(),
    }
}

impl FromValue for Value {
    fn from_value(val: &Value) -> Result<Self> {
        Ok(val.clone())
    }
}

impl FromValue for String {
    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::String(s) => Ok(s.clone()),
            _ => Err(type_error("String", val)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(val: &Value) -> Result<Self> {
        val.as_int().ok_or_else(|| type_error("Integer", val))
    }
}

impl FromValue for f64 {
    fn from_value(val: &Value) -> Result<Self> {
        val.as_float().ok_or_else(|| type_error("Float", val))
    }
}

impl FromValue for bool {
    fn from_value(val: &Value) -> Result<Self> {
        val.as_bool().ok_or_else(|| type_error("Boolean", val))
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => Err(type_error("List", val)),
        }
    }
}

/// Read `name` from `document`, coercing it to `T`.
///
/// An explicit `null` is treated like an absent field.
pub fn field<T: FromValue>(document: &Document, name: &str) -> Result<Option<T>> {
    match document.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(val) => T::from_value(val).map(Some),
    }
}

/// Derive an [`IndexStatus`] from the first metadata entry, if any.
///
/// Never fails: a missing entry, a missing `status` field, or a `status`
/// that isn't a string all map to `Unknown`.
pub fn status_of(index_name: &str, first: Option<&Document>) -> IndexStatus {
    let Some(doc) = first else {
        return IndexStatus::unknown(index_name);
    };
    match field::<String>(doc, "status") {
        Ok(raw) => IndexStatus::from_raw(index_name, raw),
        Err(e) => {
            tracing::debug!(index = index_name, error = %e, "malformed status field");
            IndexStatus::unknown(index_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IndexState, document};

    #[test]
    fn test_field_absent_is_none() {
        let doc = Document::new();
        assert_eq!(field::<String>(&doc, "status").unwrap(), None);
    }

    #[test]
    fn test_field_present() {
        let doc = document([("status", "BUILDING")]);
        assert_eq!(field::<String>(&doc, "status").unwrap().as_deref(), Some("BUILDING"));
    }

    #[test]
    fn test_field_null_is_none() {
        let doc = document([("status", Value::Null)]);
        assert_eq!(field::<String>(&doc, "status").unwrap(), None);
    }

    #[test]
    fn test_field_wrong_type_is_caller_error() {
        let doc = document([("queryable", true)]);
        let err = field::<String>(&doc, "queryable").unwrap_err();
        assert!(matches!(err, Error::TypeError { ref got, .. } if got == "BOOLEAN"));
        assert_eq!(field::<bool>(&doc, "queryable").unwrap(), Some(true));
    }

    #[test]
    fn test_field_numeric_coercion() {
        let doc = document([("numDimensions", Value::Float(384.0))]);
        assert_eq!(field::<i64>(&doc, "numDimensions").unwrap(), Some(384));
        assert_eq!(field::<f64>(&doc, "numDimensions").unwrap(), Some(384.0));
    }

    #[test]
    fn test_field_float_beyond_i64_is_type_error() {
        let doc = document([("numDimensions", Value::Float(1e20))]);
        let err = field::<i64>(&doc, "numDimensions").unwrap_err();
        assert!(matches!(err, Error::TypeError { ref got, .. } if got == "FLOAT"));
    }

    #[test]
    fn test_field_list() {
        let doc = document([("tags", Value::from(vec!["a", "b"]))]);
        let tags: Vec<String> = field(&doc, "tags").unwrap().unwrap();
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn test_status_of_missing_entry() {
        assert_eq!(status_of("idx", None).state, IndexState::Unknown);
    }

    #[test]
    fn test_status_of_malformed_field() {
        let doc = document([("status", 7i64)]);
        assert_eq!(status_of("idx", Some(&doc)).state, IndexState::Unknown);
    }

    #[test]
    fn test_status_of_ready() {
        let doc = document([("name", "idx"), ("status", "READY")]);
        assert!(status_of("idx", Some(&doc)).is_ready());
    }
}
