//! Governance resource shapes
//!
//! Policy -> policy-templates -> ConfigurationPolicy -> object-templates
//! -> merged document, plus the PlacementRule and PlacementBinding that
//! route a set of policies to clusters.

use std::collections::BTreeMap;

use policygen_document::Document;
use serde::{Deserialize, Serialize};

pub const POLICY_API_VERSION: &str = "policy.open-cluster-management.io/v1";
pub const POLICY_API_GROUP: &str = "policy.open-cluster-management.io";
pub const PLACEMENT_API_VERSION: &str = "apps.open-cluster-management.io/v1";
pub const PLACEMENT_API_GROUP: &str = "apps.open-cluster-management.io";

pub const REMEDIATION_ENFORCE: &str = "enforce";
pub const SEVERITY_LOW: &str = "low";
pub const COMPLIANCE_MUSTHAVE: &str = "musthave";

/// Compliance annotations stamped on every Policy unless configured otherwise.
pub const DEFAULT_ANNOTATIONS: &[(&str, &str)] = &[
    ("policy.open-cluster-management.io/standards", "NIST SP 800-53"),
    (
        "policy.open-cluster-management.io/categories",
        "CM Configuration Management",
    ),
    (
        "policy.open-cluster-management.io/controls",
        "CM-2 Baseline Configuration",
    ),
];

pub fn default_annotations() -> BTreeMap<String, String> {
    DEFAULT_ANNOTATIONS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectMeta {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    fn named(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.map(str::to_string),
            annotations: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: PolicySpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PolicySpec {
    pub disabled: bool,
    pub remediation_action: String,
    #[serde(rename = "policy-templates")]
    pub policy_templates: Vec<PolicyTemplate>,
}

/// Opaque wrapper around a rendered ConfigurationPolicy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PolicyTemplate {
    pub object_definition: Document,
}

impl Policy {
    pub fn new(
        name: &str,
        namespace: &str,
        annotations: BTreeMap<String, String>,
        policy_templates: Vec<PolicyTemplate>,
    ) -> Self {
        let mut metadata = ObjectMeta::named(name, Some(namespace));
        metadata.annotations = annotations;
        Self {
            api_version: POLICY_API_VERSION.to_string(),
            kind: "Policy".to_string(),
            metadata,
            spec: PolicySpec {
                disabled: false,
                remediation_action: REMEDIATION_ENFORCE.to_string(),
                policy_templates,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationPolicy {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: ConfigurationPolicySpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationPolicySpec {
    pub remediation_action: String,
    pub severity: String,
    pub namespace_selector: NamespaceSelector,
    #[serde(rename = "object-templates")]
    pub object_templates: Vec<ObjectTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamespaceSelector {
    pub exclude: Vec<String>,
    pub include: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTemplate {
    pub compliance_type: String,
    pub object_definition: Document,
}

impl ObjectTemplate {
    pub fn musthave(object_definition: Document) -> Self {
        Self {
            compliance_type: COMPLIANCE_MUSTHAVE.to_string(),
            object_definition,
        }
    }
}

impl ConfigurationPolicy {
    pub fn new(name: impl Into<String>, object_templates: Vec<ObjectTemplate>) -> Self {
        Self {
            api_version: POLICY_API_VERSION.to_string(),
            kind: "ConfigurationPolicy".to_string(),
            metadata: ObjectMeta::named(name, None),
            spec: ConfigurationPolicySpec {
                remediation_action: REMEDIATION_ENFORCE.to_string(),
                severity: SEVERITY_LOW.to_string(),
                namespace_selector: NamespaceSelector {
                    exclude: vec!["kube-*".to_string()],
                    include: vec!["*".to_string()],
                },
                object_templates,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Operator {
    In,
    Exists,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchExpression {
    pub key: String,
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRule {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: PlacementRuleSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRuleSpec {
    pub cluster_selector: ClusterSelector,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSelector {
    pub match_expressions: Vec<MatchExpression>,
}

impl PlacementRule {
    pub fn new(name: impl Into<String>, namespace: &str, expression: MatchExpression) -> Self {
        Self {
            api_version: PLACEMENT_API_VERSION.to_string(),
            kind: "PlacementRule".to_string(),
            metadata: ObjectMeta::named(name, Some(namespace)),
            spec: PlacementRuleSpec {
                cluster_selector: ClusterSelector {
                    match_expressions: vec![expression],
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementBinding {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub placement_ref: TypedReference,
    pub subjects: Vec<TypedReference>,
}

/// Reference to another resource by name, kind and API group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypedReference {
    pub name: String,
    pub kind: String,
    pub api_group: String,
}

impl TypedReference {
    pub fn policy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: "Policy".to_string(),
            api_group: POLICY_API_GROUP.to_string(),
        }
    }

    pub fn placement_rule(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: "PlacementRule".to_string(),
            api_group: PLACEMENT_API_GROUP.to_string(),
        }
    }
}

impl PlacementBinding {
    pub fn new(
        name: impl Into<String>,
        namespace: &str,
        rule_name: &str,
        subjects: Vec<TypedReference>,
    ) -> Self {
        Self {
            api_version: POLICY_API_VERSION.to_string(),
            kind: "PlacementBinding".to_string(),
            metadata: ObjectMeta::named(name, Some(namespace)),
            placement_ref: TypedReference::placement_rule(rule_name),
            subjects,
        }
    }
}
