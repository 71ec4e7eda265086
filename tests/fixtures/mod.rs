//! Test fixtures for end-to-end generation
//!
//! - `source-crs/`: reusable source documents with `$` placeholders
//! - `templates/`: generation templates for common, group and site scope

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use policygen::GenerationTemplate;

/// Path to the source documents fixture
pub fn source_crs_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/source-crs")
}

/// Path to the generation templates fixture
pub fn templates_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/templates")
}

/// Load a template from the fixture directory by file name
pub fn load_template(file_name: &str) -> GenerationTemplate {
    let path = templates_path().join(file_name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    GenerationTemplate::from_yaml(&text, file_name).expect("Failed to parse fixture template")
}

/// Copy the fixture templates into `dir`, returning the copied file names
pub fn copy_templates(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(templates_path()).unwrap() {
        let entry = entry.unwrap();
        let name = entry.file_name().to_string_lossy().into_owned();
        std::fs::copy(entry.path(), dir.join(&name)).unwrap();
        names.push(name);
    }
    names.sort();
    names
}
