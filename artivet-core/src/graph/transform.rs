// artivet-core/src/graph/transform.rs
use std::collections::HashSet;

use artivet_common::dependency::{ArtifactFilter, DependencyNode};
use artivet_common::repository::LocalRepository;
use tracing::trace;

/// Drops every non-root node the filter rejects, together with its subtree.
pub(crate) fn prune(node: &mut DependencyNode, filter: &dyn ArtifactFilter) {
    node.children_mut().retain(|child| {
        let keep = filter.include(child.artifact());
        if !keep {
            trace!("Filtered out {}", child.artifact());
        }
        keep
    });
    for child in node.children_mut() {
        prune(child, filter);
    }
}

/// Nearest-wins collapse: walking breadth-first, only the first node seen
/// for a coordinate survives; later ones are dropped with their subtree.
pub(crate) fn nearest_wins(root: &mut DependencyNode) {
    let mut seen = HashSet::new();
    seen.insert(root.artifact().coordinate.clone());
    let mut level: Vec<&mut DependencyNode> = vec![root];
    while !level.is_empty() {
        let mut next = Vec::new();
        for node in level {
            node.children_mut().retain(|child| {
                let first = seen.insert(child.artifact().coordinate.clone());
                if !first {
                    trace!("Omitted {} for conflict", child.artifact());
                }
                first
            });
            next.extend(node.children_mut().iter_mut());
        }
        level = next;
    }
}

/// Points artifacts without a file at their local repository copy, when
/// one exists.
pub(crate) fn attach_local_files(root: &mut DependencyNode, repository: &LocalRepository) {
    root.for_each_artifact_mut(&mut |artifact| {
        if artifact.file().is_some() {
            return;
        }
        let path = repository.artifact_path(artifact);
        if artivet_aio::is_file(&path) {
            artifact.set_file(path);
        }
    });
}
