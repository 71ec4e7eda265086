//! YAML boundary: splitting blobs, parsing chunks, rendering documents.

use serde::Deserialize;
use tracing::debug;

use crate::{Document, DocumentError};

/// Split a multi-document YAML blob into independently parseable chunks.
///
/// Chunks come back in source order. Documents that are empty (nothing but
/// a separator or comments) are dropped. A malformed document anywhere in
/// the blob fails the whole split.
pub fn split_documents(raw: &str) -> Result<Vec<String>, DocumentError> {
    let mut chunks = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(raw).enumerate() {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            debug!(index, "skipping empty document");
            continue;
        }
        chunks.push(serde_yaml::to_string(&value)?);
    }

    Ok(chunks)
}

/// Parse a single YAML document into a [`Document`] tree.
///
/// `.nan` and `.inf` have no representation in a [`Document`] and are
/// rejected as parse errors instead of turning into `null`.
pub fn parse_document(chunk: &str) -> Result<Document, DocumentError> {
    let value: serde_yaml::Value = serde_yaml::from_str(chunk)?;
    if has_non_finite(&value) {
        return Err(DocumentError::Parse(serde::de::Error::custom(
            "non-finite number (.nan or .inf) is not supported",
        )));
    }
    Ok(serde_yaml::from_value(value)?)
}

fn has_non_finite(value: &serde_yaml::Value) -> bool {
    match value {
        serde_yaml::Value::Number(n) => n.as_f64().is_some_and(|f| !f.is_finite()),
        serde_yaml::Value::Sequence(items) => items.iter().any(has_non_finite),
        serde_yaml::Value::Mapping(map) => map.values().any(has_non_finite),
        serde_yaml::Value::Tagged(tagged) => has_non_finite(&tagged.value),
        _ => false,
    }
}

/// Render a [`Document`] tree as YAML text.
pub fn render_document(document: &Document) -> Result<String, DocumentError> {
    Ok(serde_yaml::to_string(document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const THREE_DOCS: &str = "\
apiVersion: v1
kind: ConfigMap
metadata:
  name: first
---
apiVersion: v1
kind: Namespace
metadata:
  name: second
---
kind: List
items:
  - a
  - b
";

    #[test]
    fn test_split_preserves_order() {
        let chunks = split_documents(THREE_DOCS).unwrap();
        assert_eq!(chunks.len(), 3);

        let first = parse_document(&chunks[0]).unwrap();
        let second = parse_document(&chunks[1]).unwrap();
        let third = parse_document(&chunks[2]).unwrap();
        assert_eq!(first["metadata"]["name"], "first");
        assert_eq!(second["kind"], "Namespace");
        assert_eq!(third["items"], json!(["a", "b"]));
    }

    #[test]
    fn test_split_round_trip() {
        let originals = [
            "kind: A\nspec:\n  replicas: 3\n  image: nginx\n",
            "kind: B\ndata:\n  key: value\n  list:\n    - name: x\n      port: 80\n",
        ];
        let blob = originals.join("---\n");

        let chunks = split_documents(&blob).unwrap();
        assert_eq!(chunks.len(), originals.len());
        for (chunk, original) in chunks.iter().zip(originals) {
            assert_eq!(
                parse_document(chunk).unwrap(),
                parse_document(original).unwrap()
            );
        }
    }

    #[test]
    fn test_split_drops_empty_documents() {
        let blob = "---\na: 1\n---\n---\n# only a comment\n---\nb: 2\n";
        let chunks = split_documents(blob).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(parse_document(&chunks[0]).unwrap(), json!({"a": 1}));
        assert_eq!(parse_document(&chunks[1]).unwrap(), json!({"b": 2}));
    }

    #[test]
    fn test_split_empty_input() {
        assert!(split_documents("").unwrap().is_empty());
    }

    #[test]
    fn test_split_malformed_input() {
        let blob = "a: 1\n---\nb: [unclosed\n";
        let result = split_documents(blob);
        assert!(matches!(result, Err(DocumentError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_non_finite_numbers() {
        for text in ["a: .nan\n", "a:\n  b: [1, .inf]\n", "a: -.inf\n"] {
            assert!(
                matches!(parse_document(text), Err(DocumentError::Parse(_))),
                "{text:?} should be rejected"
            );
        }
        assert_eq!(parse_document("a: 1.5\n").unwrap(), json!({"a": 1.5}));
    }

    #[test]
    fn test_parse_preserves_key_order() {
        let doc = parse_document("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_render_then_parse() {
        let doc = json!({
            "kind": "ConfigMap",
            "metadata": {"name": "foo", "labels": {"app": "demo"}},
            "data": {"enabled": true, "count": 2}
        });
        let text = render_document(&doc).unwrap();
        assert!(text.starts_with("kind: ConfigMap"));
        assert_eq!(parse_document(&text).unwrap(), doc);
    }
}
