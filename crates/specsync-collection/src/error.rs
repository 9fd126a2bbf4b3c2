//! Error types for collection reconciliation
//!
//! Unfingerprintable leaves and malformed nodes are skipped during a walk and
//! never show up here. Only documents that cannot be reconciled at all do.

/// Collection-level failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    /// Original collection carries no `info.uid`, so no owner prefix exists
    #[error("collection has no root id (info.uid)")]
    MissingRootId,

    /// Document is not a JSON object
    #[error("collection document is not an object (found {0})")]
    NotAnObject(&'static str),
}

/// JSON type name, for error messages
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn messages() {
        assert_eq!(
            CollectionError::MissingRootId.to_string(),
            "collection has no root id (info.uid)"
        );
        assert_eq!(
            CollectionError::NotAnObject(kind_of(&json!([]))).to_string(),
            "collection document is not an object (found array)"
        );
    }
}
