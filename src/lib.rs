//! policygen - governance policy generator
//!
//! Overlays values from generation templates onto reusable source
//! documents and wraps the merged documents in Policy, PlacementRule and
//! PlacementBinding resources scoped to a site, a group or all clusters.

pub mod assembly;
pub mod config;
pub mod error;
pub mod extract;
pub mod generator;
pub mod naming;
pub mod source;
pub mod template;

pub use assembly::{build, BuildMode, PlacementScope, PolicyBuilder, PolicyMap};
pub use config::{ConfigError, ConfigOverrides, GeneratorConfig};
pub use error::PolicyGenError;
pub use extract::ResourceExtractor;
pub use generator::{GenerationReport, GeneratorError, PolicyGenerator};
pub use naming::{check_name_length, MAX_NAME_LENGTH};
pub use source::{FsSourceStore, MemorySourceStore, SourceError, SourceStore};
pub use template::{GenerationTemplate, PlacementLabels, SourceFileSpec};

pub use policygen_document::{Document, Mapping};
