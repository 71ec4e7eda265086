//! Policy assembly
//!
//! Builds the output mapping of one generation template. In governance
//! mode every merged document is wrapped as an object template inside a
//! ConfigurationPolicy and a Policy, and a PlacementRule plus
//! PlacementBinding route the policies to the template's scope. In direct
//! mode the merged documents are emitted as they are.

mod resources;
mod scope;

pub use resources::{
    default_annotations, ConfigurationPolicy, MatchExpression, ObjectTemplate, Operator, Policy,
    PlacementBinding, PlacementRule, PolicyTemplate, TypedReference, DEFAULT_ANNOTATIONS,
};
pub use scope::{PlacementScope, COMMON, GROUPS, SITES};

use std::collections::BTreeMap;
use std::path::Path;

use policygen_document::Document;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::PolicyGenError;
use crate::extract::ResourceExtractor;
use crate::naming::check_name_length;
use crate::source::{FsSourceStore, SourceStore};
use crate::template::GenerationTemplate;

/// Path prefix of documents emitted in direct mode.
pub const CUSTOM_RESOURCE_PREFIX: &str = "customResource";

/// Output path (without extension) to assembled document.
pub type PolicyMap = BTreeMap<String, Document>;

/// How merged documents are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Wrap in Policy / PlacementRule / PlacementBinding.
    #[default]
    Governance,
    /// Emit merged documents without wrapping.
    Direct,
}

impl BuildMode {
    pub fn from_direct_flag(direct: bool) -> Self {
        if direct {
            BuildMode::Direct
        } else {
            BuildMode::Governance
        }
    }
}

/// Build the outputs of `template`, reading sources from `source_dir`.
pub fn build(
    template: &GenerationTemplate,
    source_dir: &Path,
    direct: bool,
) -> Result<PolicyMap, PolicyGenError> {
    let store = FsSourceStore::new(source_dir);
    PolicyBuilder::new(template, &store).build(BuildMode::from_direct_flag(direct))
}

/// Assembles the outputs of one generation template.
pub struct PolicyBuilder<'a, S: SourceStore + ?Sized> {
    template: &'a GenerationTemplate,
    store: &'a S,
    annotations: BTreeMap<String, String>,
}

impl<'a, S: SourceStore + ?Sized> PolicyBuilder<'a, S> {
    pub fn new(template: &'a GenerationTemplate, store: &'a S) -> Self {
        Self {
            template,
            store,
            annotations: default_annotations(),
        }
    }

    /// Replace the compliance annotations stamped on each Policy.
    pub fn with_annotations(mut self, annotations: BTreeMap<String, String>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn build(&self, mode: BuildMode) -> Result<PolicyMap, PolicyGenError> {
        if self.template.source_files.is_empty() {
            debug!(template = ?self.template.name(), "template lists no source files");
            return Ok(PolicyMap::new());
        }

        match mode {
            BuildMode::Governance => self.build_governance(),
            BuildMode::Direct => self.build_direct(),
        }
    }

    fn extractor(&self) -> ResourceExtractor<'a, S> {
        ResourceExtractor::new(self.store, self.template.labels().mcp.as_deref())
    }

    fn build_governance(&self) -> Result<PolicyMap, PolicyGenError> {
        let template_name = self.template.name().ok_or_else(|| {
            PolicyGenError::Configuration("generation template is missing metadata.name".to_string())
        })?;
        let scope = PlacementScope::resolve(self.template.labels())?;
        let namespace = scope.namespace();
        let path = scope.path();
        let prefix = scope.name_prefix();
        let extractor = self.extractor();

        // Policy name -> object templates, in first-seen order
        let mut policies: Vec<(String, Vec<ObjectTemplate>)> = Vec::new();
        for source in &self.template.source_files {
            let suffix = source.policy_name.as_deref().ok_or_else(|| {
                PolicyGenError::Configuration(format!(
                    "source file {} has no policyName",
                    source.file_name
                ))
            })?;
            let name = format!("{}-{}", prefix, suffix);
            check_name_length(namespace, &name)?;

            let templates = extractor
                .extract(source)?
                .into_iter()
                .map(ObjectTemplate::musthave);
            match policies.iter_mut().find(|(existing, _)| *existing == name) {
                Some((_, object_templates)) => object_templates.extend(templates),
                None => policies.push((name, templates.collect())),
            }
        }

        let mut output = PolicyMap::new();
        let mut subjects = Vec::with_capacity(policies.len());
        for (name, object_templates) in policies {
            debug!(policy = %name, objects = object_templates.len(), "assembling policy");
            let config_policy = ConfigurationPolicy::new(format!("{}-config", name), object_templates);
            let policy_template = PolicyTemplate {
                object_definition: to_document(&config_policy)?,
            };
            let policy = Policy::new(&name, namespace, self.annotations.clone(), vec![policy_template]);

            output.insert(format!("{}/{}", path, name), to_document(&policy)?);
            subjects.push(TypedReference::policy(name));
        }

        let rule = PlacementRule::new(
            format!("{}-placementrule", template_name),
            namespace,
            scope.match_expression(),
        );
        check_name_length(namespace, &rule.metadata.name)?;

        let binding = PlacementBinding::new(
            format!("{}-placementbinding", template_name),
            namespace,
            &rule.metadata.name,
            subjects,
        );
        check_name_length(namespace, &binding.metadata.name)?;

        info!(
            template = template_name,
            scope = %scope,
            policies = binding.subjects.len(),
            "assembled governance policies"
        );

        output.insert(format!("{}/{}", path, rule.metadata.name), to_document(&rule)?);
        output.insert(format!("{}/{}", path, binding.metadata.name), to_document(&binding)?);
        Ok(output)
    }

    fn build_direct(&self) -> Result<PolicyMap, PolicyGenError> {
        let extractor = self.extractor();
        let mut output = PolicyMap::new();

        for source in &self.template.source_files {
            for resource in extractor.extract(source)? {
                let key = format!(
                    "{}/{}",
                    CUSTOM_RESOURCE_PREFIX,
                    direct_name(&resource, &source.file_name)?
                );
                if output.contains_key(&key) {
                    warn!(key = %key, file = %source.file_name, "duplicate custom resource, replacing earlier one");
                }
                output.insert(key, resource);
            }
        }

        info!(
            template = ?self.template.name(),
            resources = output.len(),
            "assembled custom resources"
        );
        Ok(output)
    }
}

/// `<kind>-<metadata.name>[-<metadata.namespace>]`
fn direct_name(resource: &Document, origin: &str) -> Result<String, PolicyGenError> {
    let kind = resource
        .get("kind")
        .and_then(Document::as_str)
        .ok_or_else(|| PolicyGenError::Configuration(format!("{}: document has no kind", origin)))?;
    let name = resource
        .pointer("/metadata/name")
        .and_then(Document::as_str)
        .ok_or_else(|| {
            PolicyGenError::Configuration(format!("{}: document has no metadata.name", origin))
        })?;

    Ok(match resource.pointer("/metadata/namespace").and_then(Document::as_str) {
        Some(namespace) => format!("{}-{}-{}", kind, name, namespace),
        None => format!("{}-{}", kind, name),
    })
}

fn to_document<T: Serialize>(value: &T) -> Result<Document, PolicyGenError> {
    Ok(serde_json::to_value(value)?)
}
