// artivet-common/src/dependency/graph.rs
use std::fmt;
use std::path::{Path, PathBuf};

use super::filter::ArtifactFilter;
use super::node::DependencyNode;
use crate::error::Result;

/// What a graph builder needs to know about the project being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    pub name: String,
    pub descriptor: PathBuf,
}

impl ProjectContext {
    pub fn new(name: impl Into<String>, descriptor: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    /// Names the project after its descriptor's file stem.
    pub fn from_descriptor(descriptor: &Path) -> Self {
        let name = descriptor
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| descriptor.display().to_string());
        Self::new(name, descriptor)
    }
}

impl fmt::Display for ProjectContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.descriptor.display())
    }
}

/// Whether the builder may collapse duplicate dependencies before
/// returning the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphTransform {
    /// Nearest-wins collapse, the builder's usual behaviour.
    #[default]
    ConflictResolution,
    /// Every duplicate node is returned untouched.
    None,
}

#[derive(Debug, Clone)]
pub struct GraphRequest {
    pub project: ProjectContext,
    pub transform: GraphTransform,
}

impl GraphRequest {
    pub fn raw(project: ProjectContext) -> Self {
        Self {
            project,
            transform: GraphTransform::None,
        }
    }
}

/// Produces the dependency tree of a project, dropping nodes rejected by
/// `filter` (the root is never filtered).
pub trait GraphBuilder {
    fn build_graph(
        &self,
        request: &GraphRequest,
        filter: &dyn ArtifactFilter,
    ) -> Result<DependencyNode>;
}
