//! Generator driver
//!
//! Walks the template directory, builds each generation template and
//! writes the rendered outputs under the output root. Templates are
//! processed one at a time in file-name order. Outputs of a template are
//! only written once the whole template has built and rendered, and only
//! streamed to stdout once all of them are written. A write failure can
//! leave earlier outputs of the same template on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use policygen_document::render_document;
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::assembly::{BuildMode, PolicyBuilder};
use crate::config::GeneratorConfig;
use crate::error::PolicyGenError;
use crate::source::FsSourceStore;
use crate::template::GenerationTemplate;

/// Separator printed before each document streamed to stdout.
pub const DOCUMENT_SEPARATOR: &str = "---";

/// Errors for the generator driver
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Failed to list templates in {path}: {source}")]
    ListTemplates {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid template glob: {0}")]
    Glob(#[from] globset::Error),

    #[error("Failed to read template {path}: {source}")]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Template {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: PolicyGenError,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A template that failed under keep-going mode
#[derive(Debug, Clone)]
pub struct TemplateFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of a generator run
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Templates processed, failed ones included
    pub templates: usize,

    /// Files written, in write order
    pub written: Vec<PathBuf>,

    pub failures: Vec<TemplateFailure>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives template discovery, building and output writing.
pub struct PolicyGenerator {
    config: GeneratorConfig,
    store: FsSourceStore,
}

impl PolicyGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let store = FsSourceStore::new(&config.source_dir).with_extension(config.file_ext.clone());
        Self { config, store }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Template files in the template directory, sorted by file name.
    pub fn template_files(&self) -> Result<Vec<PathBuf>, GeneratorError> {
        let matcher: GlobMatcher = Glob::new(&self.config.template_glob)?.compile_matcher();
        let root = &self.config.template_dir;
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = entry.map_err(|source| GeneratorError::ListTemplates {
                path: root.clone(),
                source,
            })?;
            if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Process every template.
    ///
    /// Without keep-going the first failing template aborts the run; outputs
    /// already written for earlier templates stay on disk.
    pub fn generate(&self) -> Result<GenerationReport, GeneratorError> {
        let mut report = GenerationReport::default();

        for path in self.template_files()? {
            report.templates += 1;
            match self.process_template(&path) {
                Ok(written) => report.written.extend(written),
                Err(err) if self.config.keep_going => {
                    error!(template = %path.display(), error = %err, "template failed, continuing");
                    report.failures.push(TemplateFailure {
                        path,
                        message: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            templates = report.templates,
            written = report.written.len(),
            failed = report.failures.len(),
            "generation finished"
        );
        Ok(report)
    }

    /// Build one template and write its outputs. Returns the written paths.
    pub fn process_template(&self, path: &Path) -> Result<Vec<PathBuf>, GeneratorError> {
        info!(template = %path.display(), "processing template");

        let text = fs::read_to_string(path).map_err(|source| GeneratorError::ReadTemplate {
            path: path.to_path_buf(),
            source,
        })?;
        let template_error = |source: PolicyGenError| GeneratorError::Template {
            path: path.to_path_buf(),
            source,
        };

        let template = GenerationTemplate::from_yaml(&text, &path.display().to_string())
            .map_err(template_error)?;
        let outputs = PolicyBuilder::new(&template, &self.store)
            .with_annotations(self.config.annotations.clone())
            .build(BuildMode::from_direct_flag(self.config.custom_resources))
            .map_err(template_error)?;

        // Render everything first so a failing template writes nothing
        let rendered = outputs
            .iter()
            .map(|(key, document)| {
                render_document(document)
                    .map(|text| (key.as_str(), text))
                    .map_err(|e| template_error(PolicyGenError::in_document(key, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut written = Vec::with_capacity(rendered.len());
        for (key, text) in &rendered {
            written.push(self.write_output(key, text)?);
        }

        if self.config.stdout {
            for (_, text) in &rendered {
                println!("{}", DOCUMENT_SEPARATOR);
                println!("{}", text);
            }
        }

        Ok(written)
    }

    fn write_output(&self, key: &str, text: &str) -> Result<PathBuf, GeneratorError> {
        let path = self
            .config
            .out_dir
            .join(format!("{}{}", key, self.config.file_ext));
        let write_error = |source| GeneratorError::Write {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(&path, text).map_err(write_error)?;

        debug!(path = %path.display(), "wrote output");
        Ok(path)
    }
}
