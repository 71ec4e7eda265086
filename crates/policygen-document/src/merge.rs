//! Closed-world overlay merge
//!
//! Walks the keys of the base mapping, never the overlay's:
//! - Mappings: recurse key by key
//! - Sequences of mappings: merge element-wise, base length wins
//! - Sequences of scalars: REPLACE
//! - Scalars: override
//! - Unfilled placeholders (`""` or `"$..."`) with no overlay value: dropped

use tracing::{debug, warn};

use crate::{Document, DocumentError, Kind, Mapping, PLACEHOLDER_MARKER};

/// Overlay `overlay` onto `base`.
///
/// Keys present only in the overlay are ignored. An explicit `null` in the
/// overlay counts as "no value" for that key. Fails with
/// [`DocumentError::TypeMismatch`] when the overlay's structure disagrees
/// with the base at some key.
pub fn merge_overlay(base: Mapping, overlay: Option<&Mapping>) -> Result<Mapping, DocumentError> {
    merge_mapping(base, overlay, "")
}

/// True for base values that are unfilled placeholders.
pub fn is_unfilled(value: &Document) -> bool {
    match value {
        Document::String(s) => s.is_empty() || s.starts_with(PLACEHOLDER_MARKER),
        _ => false,
    }
}

fn merge_mapping(
    base: Mapping,
    overlay: Option<&Mapping>,
    path: &str,
) -> Result<Mapping, DocumentError> {
    if let Some(overlay) = overlay {
        for key in overlay.keys().filter(|k| !base.contains_key(*k)) {
            warn!(path = %child_path(path, key), "overlay key not present in base document, ignored");
        }
    }

    let mut merged = Mapping::with_capacity(base.len());
    for (key, value) in base {
        let key_path = child_path(path, &key);
        let patch = overlay
            .and_then(|o| o.get(&key))
            .filter(|v| !v.is_null());

        match patch {
            Some(patch) => {
                let value = merge_value(value, patch, &key_path)?;
                merged.insert(key, value);
            }
            None if is_unfilled(&value) => {
                debug!(path = %key_path, "dropping unfilled placeholder");
            }
            None => {
                merged.insert(key, value);
            }
        }
    }

    Ok(merged)
}

fn merge_value(base: Document, patch: &Document, path: &str) -> Result<Document, DocumentError> {
    match (base, patch) {
        // An unset slot takes whatever the overlay supplies
        (Document::Null, patch) => Ok(patch.clone()),

        (Document::Object(map), Document::Object(patch_map)) => {
            merge_mapping(map, Some(patch_map), path).map(Document::Object)
        }

        (Document::Array(items), Document::Array(patch_items))
            if items.first().is_some_and(Document::is_object) =>
        {
            merge_sequence(items, patch_items, path).map(Document::Array)
        }

        // Scalar sequences (and empty ones): REPLACE
        (Document::Array(_), patch @ Document::Array(_)) => Ok(patch.clone()),

        (base, patch) if Kind::of(&base) == Kind::Scalar && Kind::of(patch) == Kind::Scalar => {
            Ok(patch.clone())
        }

        (base, patch) => Err(DocumentError::TypeMismatch {
            path: path.to_string(),
            expected: Kind::of(&base),
            found: Kind::of(patch),
        }),
    }
}

fn merge_sequence(
    items: Vec<Document>,
    patch_items: &[Document],
    path: &str,
) -> Result<Vec<Document>, DocumentError> {
    if patch_items.len() > items.len() {
        warn!(
            path,
            base = items.len(),
            overlay = patch_items.len(),
            "overlay sequence longer than base, extra elements ignored"
        );
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match patch_items.get(index).filter(|p| !p.is_null()) {
            Some(patch) => merge_value(item, patch, &format!("{}[{}]", path, index)),
            None => Ok(item),
        })
        .collect()
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}
