//! Placement scope resolution.

use std::fmt;

use crate::error::PolicyGenError;
use crate::template::PlacementLabels;

use super::resources::{MatchExpression, Operator};

pub const SITES: &str = "sites";
pub const GROUPS: &str = "groups";
pub const COMMON: &str = "common";

pub const SITE_NAMESPACE: &str = "sites-sub";
pub const GROUP_NAMESPACE: &str = "groups-sub";
pub const COMMON_NAMESPACE: &str = "common-sub";

/// Which cluster set a template's policies target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementScope {
    Site(String),
    Group(String),
    Common,
}

impl PlacementScope {
    /// Resolve the scope with precedence site > group > common.
    pub fn resolve(labels: &PlacementLabels) -> Result<Self, PolicyGenError> {
        if let Some(site) = &labels.site_name {
            Ok(PlacementScope::Site(site.clone()))
        } else if let Some(group) = &labels.group_name {
            Ok(PlacementScope::Group(group.clone()))
        } else if labels.common {
            Ok(PlacementScope::Common)
        } else {
            Err(PolicyGenError::Configuration(
                "missing placement scope: one of siteName, groupName or common must be set"
                    .to_string(),
            ))
        }
    }

    pub fn namespace(&self) -> &'static str {
        match self {
            PlacementScope::Site(_) => SITE_NAMESPACE,
            PlacementScope::Group(_) => GROUP_NAMESPACE,
            PlacementScope::Common => COMMON_NAMESPACE,
        }
    }

    /// Output path prefix, e.g. `sites/du-sno-1`.
    pub fn path(&self) -> String {
        match self {
            PlacementScope::Site(site) => format!("{}/{}", SITES, site),
            PlacementScope::Group(group) => format!("{}/{}", GROUPS, group),
            PlacementScope::Common => COMMON.to_string(),
        }
    }

    /// Prefix of generated policy names. Lower-cased so the result is a
    /// valid RFC 1123 name.
    pub fn name_prefix(&self) -> String {
        match self {
            PlacementScope::Site(value) | PlacementScope::Group(value) => value.to_lowercase(),
            PlacementScope::Common => COMMON.to_string(),
        }
    }

    pub fn match_expression(&self) -> MatchExpression {
        match self {
            PlacementScope::Site(site) => MatchExpression {
                key: SITES.to_string(),
                operator: Operator::In,
                values: vec![site.clone()],
            },
            PlacementScope::Group(group) => MatchExpression {
                key: group.clone(),
                operator: Operator::Exists,
                values: Vec::new(),
            },
            PlacementScope::Common => MatchExpression {
                key: COMMON.to_string(),
                operator: Operator::In,
                values: vec!["true".to_string()],
            },
        }
    }
}

impl fmt::Display for PlacementScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementScope::Site(site) => write!(f, "site {}", site),
            PlacementScope::Group(group) => write!(f, "group {}", group),
            PlacementScope::Common => f.write_str(COMMON),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(site: Option<&str>, group: Option<&str>, common: bool) -> PlacementLabels {
        PlacementLabels {
            common,
            group_name: group.map(str::to_string),
            site_name: site.map(str::to_string),
            mcp: None,
        }
    }

    #[test]
    fn test_site_wins_over_group_and_common() {
        let scope = PlacementScope::resolve(&labels(Some("edge1"), Some("g1"), true)).unwrap();
        assert_eq!(scope, PlacementScope::Site("edge1".to_string()));
        assert_eq!(scope.path(), "sites/edge1");
        assert_eq!(scope.namespace(), "sites-sub");
    }

    #[test]
    fn test_group_wins_over_common() {
        let scope = PlacementScope::resolve(&labels(None, Some("du-sno"), true)).unwrap();
        assert_eq!(scope, PlacementScope::Group("du-sno".to_string()));
        assert_eq!(scope.path(), "groups/du-sno");
        assert_eq!(scope.namespace(), "groups-sub");
    }

    #[test]
    fn test_common_scope() {
        let scope = PlacementScope::resolve(&labels(None, None, true)).unwrap();
        assert_eq!(scope.path(), "common");
        assert_eq!(scope.name_prefix(), "common");
        assert_eq!(scope.namespace(), "common-sub");
    }

    #[test]
    fn test_missing_scope() {
        let err = PlacementScope::resolve(&labels(None, None, false)).unwrap_err();
        assert!(matches!(err, PolicyGenError::Configuration(_)));
        assert!(err.to_string().contains("missing placement scope"));
    }

    #[test]
    fn test_name_prefix_lowercased_path_is_not() {
        let scope = PlacementScope::Site("Edge-SNO".to_string());
        assert_eq!(scope.name_prefix(), "edge-sno");
        assert_eq!(scope.path(), "sites/Edge-SNO");

        let group = PlacementScope::Group("DU-SNO".to_string());
        assert_eq!(group.name_prefix(), "du-sno");
        assert_eq!(group.path(), "groups/DU-SNO");
    }

    #[test]
    fn test_match_expressions() {
        let site = PlacementScope::Site("edge1".to_string()).match_expression();
        assert_eq!(site.key, "sites");
        assert_eq!(site.operator, Operator::In);
        assert_eq!(site.values, vec!["edge1".to_string()]);

        let group = PlacementScope::Group("du-3node".to_string()).match_expression();
        assert_eq!(group.key, "du-3node");
        assert_eq!(group.operator, Operator::Exists);
        assert!(group.values.is_empty());

        let common = PlacementScope::Common.match_expression();
        assert_eq!(common.key, "common");
        assert_eq!(common.values, vec!["true".to_string()]);
    }
}
