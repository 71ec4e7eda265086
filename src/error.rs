//! Error taxonomy for policy generation.
//!
//! Every variant is fatal for the generation template being processed.

use policygen_document::{DocumentError, Kind};

use crate::naming::MAX_NAME_LENGTH;
use crate::source::SourceError;

/// Errors raised while building the outputs of one generation template.
#[derive(Debug, thiserror::Error)]
pub enum PolicyGenError {
    #[error("Parse error in {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(
        "Name {namespace}.{name} is {} characters, limit is {}",
        full_length(.namespace, .name),
        MAX_NAME_LENGTH
    )]
    NameLength { namespace: String, name: String },

    #[error("Type mismatch in {origin} at {path}: base value is a {expected}, overlay value is a {found}")]
    TypeMismatch {
        origin: String,
        path: String,
        expected: Kind,
        found: Kind,
    },

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Render error: {0}")]
    Render(#[from] serde_json::Error),
}

impl PolicyGenError {
    /// Attach the originating file to a document-level error.
    pub(crate) fn in_document(origin: &str, err: DocumentError) -> Self {
        match err {
            DocumentError::Parse(e) => PolicyGenError::Parse {
                origin: origin.to_string(),
                message: e.to_string(),
            },
            DocumentError::TypeMismatch {
                path,
                expected,
                found,
            } => PolicyGenError::TypeMismatch {
                origin: origin.to_string(),
                path,
                expected,
                found,
            },
        }
    }
}

fn full_length(namespace: &str, name: &str) -> usize {
    namespace.len() + 1 + name.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_length_message_reports_length() {
        let err = PolicyGenError::NameLength {
            namespace: "sites-sub".to_string(),
            name: "x".repeat(60),
        };
        assert_eq!(
            err.to_string(),
            format!("Name sites-sub.{} is 70 characters, limit is 63", "x".repeat(60))
        );
    }

    #[test]
    fn test_in_document_keeps_path() {
        let err = PolicyGenError::in_document(
            "ptp-config",
            DocumentError::TypeMismatch {
                path: "spec.profile".to_string(),
                expected: Kind::Sequence,
                found: Kind::Scalar,
            },
        );
        assert!(matches!(
            err,
            PolicyGenError::TypeMismatch { ref origin, ref path, .. }
                if origin == "ptp-config" && path == "spec.profile"
        ));
    }
}
