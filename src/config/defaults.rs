//! Built-in generator defaults (layer 1)

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::assembly::default_annotations;
use crate::source::DEFAULT_FILE_EXT;

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Directory holding source documents (default: ".")
    pub source_dir: PathBuf,

    /// Directory holding generation templates (default: ".")
    pub template_dir: PathBuf,

    /// Output root (default: "./policies")
    pub out_dir: PathBuf,

    /// Extension of sources, templates and outputs (default: ".yaml")
    pub file_ext: String,

    /// Which template-directory entries are templates (default: "*.yaml")
    pub template_glob: String,

    /// Compliance annotations stamped on each Policy
    pub annotations: BTreeMap<String, String>,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            template_dir: PathBuf::from("."),
            out_dir: PathBuf::from("./policies"),
            file_ext: DEFAULT_FILE_EXT.to_string(),
            template_glob: format!("*{}", DEFAULT_FILE_EXT),
            annotations: default_annotations(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for layering
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "source_dir": self.source_dir,
            "template_dir": self.template_dir,
            "out_dir": self.out_dir,
            "stdout": false,
            "custom_resources": false,
            "keep_going": false,
            "file_ext": self.file_ext,
            "template_glob": self.template_glob,
            "annotations": self.annotations,
        })
    }
}
