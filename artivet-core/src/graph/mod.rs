// artivet-core/src/graph/mod.rs
//! A [`GraphBuilder`] reading pre-computed dependency trees from JSON
//! documents on disk.
mod document;
mod transform;

use artivet_common::dependency::{
    ArtifactFilter, DependencyNode, GraphBuilder, GraphRequest, GraphTransform,
};
use artivet_common::error::Result;
use artivet_common::repository::LocalRepository;
use tracing::debug;

pub use document::TreeFormat;

#[derive(Debug, Clone, Default)]
pub struct TreeDocumentBuilder {
    format: TreeFormat,
    repository: Option<LocalRepository>,
}

impl TreeDocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: TreeFormat) -> Self {
        self.format = format;
        self
    }

    /// Files already present in `repository` are attached to the nodes
    /// they belong to.
    pub fn with_repository(mut self, repository: LocalRepository) -> Self {
        self.repository = Some(repository);
        self
    }
}

impl GraphBuilder for TreeDocumentBuilder {
    fn build_graph(
        &self,
        request: &GraphRequest,
        filter: &dyn ArtifactFilter,
    ) -> Result<DependencyNode> {
        let mut root = document::load_tree(&request.project.descriptor, self.format)?;
        transform::prune(&mut root, filter);
        if let Some(repository) = &self.repository {
            transform::attach_local_files(&mut root, repository);
        }
        if request.transform == GraphTransform::ConflictResolution {
            transform::nearest_wins(&mut root);
        }
        debug!(
            "Built tree for {} with {} nodes",
            request.project,
            root.node_count()
        );
        Ok(root)
    }
}
