// artivet-common/src/dependency/tree.rs
//! The two shapes a raw dependency tree can arrive in, and their adapters
//! into [`DependencyNode`].
//!
//! * [`LegacyNode`] spells out every coordinate field on the node.
//! * [`GraphNode`] wraps a [`GraphDependency`] whose artifact is a single
//!   `group:name[:extension[:classifier]]:version` string.
//!
//! Both convert losslessly into the canonical node so the visitor only has
//! one tree type to walk.
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::node::DependencyNode;
use crate::error::{ArtivetError, Result};
use crate::model::artifact::{DEFAULT_SCOPE, DEFAULT_TYPE};
use crate::model::Artifact;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyNode {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(rename = "type", default = "default_type")]
    pub kind: String,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub children: Vec<LegacyNode>,
}

fn default_type() -> String {
    DEFAULT_TYPE.to_string()
}

/// Unscoped or blank-scoped dependencies are `compile`.
fn scope_or_default(scope: Option<&str>) -> Option<String> {
    let scope = scope.map(str::trim).filter(|s| !s.is_empty());
    Some(scope.unwrap_or(DEFAULT_SCOPE).to_string())
}

impl From<&LegacyNode> for DependencyNode {
    fn from(node: &LegacyNode) -> Self {
        let mut artifact = Artifact::new(&node.group_id, &node.artifact_id, &node.version)
            .with_kind(&node.kind)
            .with_scope(scope_or_default(node.scope.as_deref()))
            .with_optional(node.optional);
        if let Some(classifier) = &node.classifier {
            artifact = artifact.with_classifier(classifier);
        }
        if let Some(file) = &node.file {
            artifact = artifact.with_file(file);
        }
        DependencyNode::new(artifact).with_children(node.children.iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDependency {
    pub artifact: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub dependency: GraphDependency,
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub children: Vec<GraphNode>,
}

/// Parsed form of `group:name[:extension[:classifier]]:version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCoords {
    pub group: String,
    pub name: String,
    pub extension: String,
    pub classifier: Option<String>,
    pub version: String,
}

impl FromStr for ArtifactCoords {
    type Err = ArtivetError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let (group, name, extension, classifier, version) = match parts.as_slice() {
            [g, a, v] => (*g, *a, DEFAULT_TYPE, None, *v),
            [g, a, e, v] => (*g, *a, *e, None, *v),
            [g, a, e, c, v] => (*g, *a, *e, Some(*c), *v),
            _ => {
                return Err(ArtivetError::Parse(
                    "artifact coordinates",
                    format!("expected group:name[:extension[:classifier]]:version, got '{s}'"),
                ))
            }
        };
        if [group, name, extension, version].iter().any(|p| p.is_empty()) {
            return Err(ArtivetError::Parse(
                "artifact coordinates",
                format!("empty segment in '{s}'"),
            ));
        }
        Ok(Self {
            group: group.to_string(),
            name: name.to_string(),
            extension: extension.to_string(),
            classifier: classifier.filter(|c| !c.is_empty()).map(str::to_string),
            version: version.to_string(),
        })
    }
}

impl TryFrom<&GraphNode> for DependencyNode {
    type Error = ArtivetError;

    fn try_from(node: &GraphNode) -> Result<Self> {
        let coords: ArtifactCoords = node.dependency.artifact.parse()?;
        let mut artifact = Artifact::new(coords.group, coords.name, &coords.version)
            .with_kind(coords.extension)
            .with_scope(scope_or_default(node.dependency.scope.as_deref()))
            .with_optional(node.dependency.optional);
        if let Some(classifier) = coords.classifier {
            artifact = artifact.with_classifier(classifier);
        }
        if let Some(file) = &node.file {
            artifact = artifact.with_file(file);
        }
        let children = node
            .children
            .iter()
            .map(DependencyNode::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(DependencyNode::new(artifact).with_children(children))
    }
}
