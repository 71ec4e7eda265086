//! Error types for document handling.

use std::fmt;

use crate::Document;

/// Structural kind of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// String, number, bool or null.
    Scalar,
    Mapping,
    Sequence,
}

impl Kind {
    /// Classify a document node.
    pub fn of(value: &Document) -> Self {
        match value {
            Document::Object(_) => Kind::Mapping,
            Document::Array(_) => Kind::Sequence,
            _ => Kind::Scalar,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Scalar => "scalar",
            Kind::Mapping => "mapping",
            Kind::Sequence => "sequence",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while splitting, parsing or merging documents.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Type mismatch at {path}: base value is a {expected}, overlay value is a {found}")]
    TypeMismatch {
        path: String,
        expected: Kind,
        found: Kind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_of() {
        assert_eq!(Kind::of(&json!({"a": 1})), Kind::Mapping);
        assert_eq!(Kind::of(&json!([1, 2])), Kind::Sequence);
        assert_eq!(Kind::of(&json!("x")), Kind::Scalar);
        assert_eq!(Kind::of(&json!(null)), Kind::Scalar);
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = DocumentError::TypeMismatch {
            path: "spec.replicas".to_string(),
            expected: Kind::Scalar,
            found: Kind::Mapping,
        };
        assert_eq!(
            err.to_string(),
            "Type mismatch at spec.replicas: base value is a scalar, overlay value is a mapping"
        );
    }
}
