//! Generation template model
//!
//! A generation template names the source documents to merge and the
//! placement scope the resulting policies target. Optional string fields
//! treat the legacy `"N/A"` marker and the empty string as absent.

use std::collections::BTreeMap;

use policygen_document::Mapping;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PolicyGenError;

/// Legacy marker for "no value" in template fields.
pub const NOT_APPLICABLE: &str = "N/A";

/// One generation template document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default)]
    pub metadata: TemplateMetadata,

    #[serde(default)]
    pub source_files: Vec<SourceFileSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateMetadata {
    #[serde(default, deserialize_with = "optional_value")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "optional_value")]
    pub namespace: Option<String>,

    #[serde(default)]
    pub labels: PlacementLabels,
}

/// Placement targeting and the `mcp` substitution variable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementLabels {
    #[serde(default)]
    pub common: bool,

    #[serde(default, deserialize_with = "optional_value")]
    pub group_name: Option<String>,

    #[serde(default, deserialize_with = "optional_value")]
    pub site_name: Option<String>,

    #[serde(default, deserialize_with = "optional_value")]
    pub mcp: Option<String>,
}

/// A reference to one source document plus the values to overlay onto it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFileSpec {
    /// Source file name without extension.
    pub file_name: String,

    /// Suffix of the generated policy name.
    #[serde(default, deserialize_with = "optional_value")]
    pub policy_name: Option<String>,

    /// Replacement for `metadata.name` of a single-document source.
    #[serde(default, deserialize_with = "optional_value")]
    pub name: Option<String>,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    #[serde(default)]
    pub spec: Option<Mapping>,

    #[serde(default)]
    pub data: Option<Mapping>,
}

impl GenerationTemplate {
    /// Parse a template from YAML text. `origin` names the input in errors.
    pub fn from_yaml(text: &str, origin: &str) -> Result<Self, PolicyGenError> {
        serde_yaml::from_str(text).map_err(|e| PolicyGenError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.name.as_deref()
    }

    pub fn labels(&self) -> &PlacementLabels {
        &self.metadata.labels
    }
}

impl SourceFileSpec {
    pub fn spec_overlay(&self) -> Option<&Mapping> {
        self.spec.as_ref().filter(|m| !m.is_empty())
    }

    pub fn data_overlay(&self) -> Option<&Mapping> {
        self.data.as_ref().filter(|m| !m.is_empty())
    }

    /// True when either the spec or the data overlay carries values.
    pub fn has_overlay(&self) -> bool {
        self.spec_overlay().is_some() || self.data_overlay().is_some()
    }
}

fn optional_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty() && v != NOT_APPLICABLE))
}
