//! Structured documents for policygen.
//!
//! Splits multi-document YAML blobs, converts between YAML text and the
//! in-memory [`Document`] tree, and overlays partial values onto base
//! documents without ever adding keys the base does not have.

mod codec;
mod error;
mod merge;

pub use codec::{parse_document, render_document, split_documents};
pub use error::{DocumentError, Kind};
pub use merge::{is_unfilled, merge_overlay};

/// A parsed document tree. Mapping keys keep their insertion order.
pub type Document = serde_json::Value;

/// A mapping node of a [`Document`].
pub type Mapping = serde_json::Map<String, Document>;

/// Prefix that marks a base value as an unfilled placeholder.
pub const PLACEHOLDER_MARKER: char = '$';
