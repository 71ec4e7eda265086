//! Custom resource extraction
//!
//! Turns one [`SourceFileSpec`] into its merged documents: load the raw
//! text, substitute `$mcp`, split, reject ambiguous overlays, merge, and
//! stamp the requested name and labels.

use std::collections::BTreeMap;

use policygen_document::{merge_overlay, parse_document, split_documents, Document, Kind, Mapping};
use tracing::{debug, warn};

use crate::error::PolicyGenError;
use crate::source::SourceStore;
use crate::template::SourceFileSpec;

/// Token replaced by the template's `mcp` label before parsing.
pub const MCP_TOKEN: &str = "$mcp";

/// Extracts merged documents from source files.
pub struct ResourceExtractor<'a, S: SourceStore + ?Sized> {
    store: &'a S,
    mcp: Option<&'a str>,
}

impl<'a, S: SourceStore + ?Sized> ResourceExtractor<'a, S> {
    pub fn new(store: &'a S, mcp: Option<&'a str>) -> Self {
        Self { store, mcp }
    }

    /// Produce the merged documents of one source file, in source order.
    pub fn extract(&self, source: &SourceFileSpec) -> Result<Vec<Document>, PolicyGenError> {
        let origin = source.file_name.as_str();
        let raw = self.store.load(origin)?;
        let text = substitute_mcp(raw, self.mcp);

        let chunks =
            split_documents(&text).map_err(|e| PolicyGenError::in_document(origin, e))?;
        debug!(file = origin, documents = chunks.len(), "split source file");

        match chunks.len() {
            0 => {
                warn!(file = origin, "source file contains no documents");
                Ok(Vec::new())
            }
            1 => {
                let document = self.parse(origin, &chunks[0])?;
                let merged =
                    apply_overlays(document, source.spec_overlay(), source.data_overlay(), origin)?;
                let merged =
                    stamp_metadata(merged, source.name.as_deref(), &source.labels, origin)?;
                Ok(vec![merged])
            }
            count if source.has_overlay() => Err(PolicyGenError::Configuration(format!(
                "ambiguous overlay target: {} contains {} documents but sets spec or data; \
                 split it into one file per document",
                origin, count
            ))),
            _ => chunks
                .iter()
                .map(|chunk| {
                    let document = self.parse(origin, chunk)?;
                    let merged = apply_overlays(document, None, None, origin)?;
                    stamp_metadata(merged, None, &source.labels, origin)
                })
                .collect(),
        }
    }

    fn parse(&self, origin: &str, chunk: &str) -> Result<Document, PolicyGenError> {
        parse_document(chunk).map_err(|e| PolicyGenError::in_document(origin, e))
    }
}

/// Literal replacement of [`MCP_TOKEN`] in raw source text.
pub fn substitute_mcp(raw: String, mcp: Option<&str>) -> String {
    match mcp {
        Some(value) if raw.contains(MCP_TOKEN) => raw.replace(MCP_TOKEN, value),
        _ => raw,
    }
}

/// Merge the spec overlay into the document's `spec` and the data overlay
/// into its `data`. Other top-level keys are left alone.
pub fn apply_overlays(
    document: Document,
    spec: Option<&Mapping>,
    data: Option<&Mapping>,
    origin: &str,
) -> Result<Document, PolicyGenError> {
    let Document::Object(mut root) = document else {
        return Err(PolicyGenError::Configuration(format!(
            "{}: top-level document is not a mapping",
            origin
        )));
    };

    for (field, overlay) in [("spec", spec), ("data", data)] {
        match root.get_mut(field) {
            Some(Document::Object(subtree)) => {
                let base = std::mem::take(subtree);
                *subtree = merge_overlay(base, overlay)
                    .map_err(|e| PolicyGenError::in_document(origin, e))
                    .map_err(|e| prefix_path(e, field))?;
            }
            Some(other) if overlay.is_some() => {
                return Err(PolicyGenError::TypeMismatch {
                    origin: origin.to_string(),
                    path: field.to_string(),
                    expected: Kind::of(other),
                    found: Kind::Mapping,
                });
            }
            Some(_) => {}
            None if overlay.is_some() => {
                warn!(file = origin, field, "overlay supplied but document has no such section, ignored");
            }
            None => {}
        }
    }

    Ok(Document::Object(root))
}

fn prefix_path(err: PolicyGenError, field: &str) -> PolicyGenError {
    match err {
        PolicyGenError::TypeMismatch {
            origin,
            path,
            expected,
            found,
        } => PolicyGenError::TypeMismatch {
            origin,
            path: format!("{}.{}", field, path),
            expected,
            found,
        },
        other => other,
    }
}

/// Overwrite `metadata.name` and `metadata.labels` when supplied.
fn stamp_metadata(
    document: Document,
    name: Option<&str>,
    labels: &BTreeMap<String, String>,
    origin: &str,
) -> Result<Document, PolicyGenError> {
    if name.is_none() && labels.is_empty() {
        return Ok(document);
    }

    let Document::Object(mut root) = document else {
        return Err(PolicyGenError::Configuration(format!(
            "{}: top-level document is not a mapping",
            origin
        )));
    };

    let metadata = match root
        .entry("metadata")
        .or_insert_with(|| Document::Object(Mapping::new()))
    {
        Document::Object(map) => map,
        other => {
            return Err(PolicyGenError::TypeMismatch {
                origin: origin.to_string(),
                path: "metadata".to_string(),
                expected: Kind::of(other),
                found: Kind::Mapping,
            })
        }
    };

    if let Some(name) = name {
        metadata.insert("name".to_string(), Document::from(name));
    }
    if !labels.is_empty() {
        let labels: Mapping = labels
            .iter()
            .map(|(k, v)| (k.clone(), Document::from(v.as_str())))
            .collect();
        metadata.insert("labels".to_string(), Document::Object(labels));
    }

    Ok(Document::Object(root))
}
