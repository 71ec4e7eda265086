//! Loading raw source documents by file name.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default extension of source documents, templates and outputs.
pub const DEFAULT_FILE_EXT: &str = ".yaml";

/// Errors for source loading
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read source file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Source file not found: {0}")]
    NotFound(String),
}

/// Where raw source documents come from.
pub trait SourceStore {
    /// Load the raw text of the source referenced by `file_name`.
    fn load(&self, file_name: &str) -> Result<String, SourceError>;
}

/// Reads `<root>/<file_name><ext>` from disk.
#[derive(Debug, Clone)]
pub struct FsSourceStore {
    root: PathBuf,
    extension: String,
}

impl FsSourceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_FILE_EXT.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the source referenced by `file_name`.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.root.join(format!("{}{}", file_name, self.extension))
    }
}

impl SourceStore for FsSourceStore {
    fn load(&self, file_name: &str) -> Result<String, SourceError> {
        let path = self.path_for(file_name);
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound(path.display().to_string()),
            _ => SourceError::Read { path, source },
        })
    }
}

/// In-memory sources keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct MemorySourceStore {
    files: BTreeMap<String, String>,
}

impl MemorySourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, file_name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(file_name.into(), contents.into());
        self
    }
}

impl SourceStore for MemorySourceStore {
    fn load(&self, file_name: &str) -> Result<String, SourceError> {
        self.files
            .get(file_name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(file_name.to_string()))
    }
}
