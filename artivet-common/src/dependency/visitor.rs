// artivet-common/src/dependency/visitor.rs
//! Bottom-up conflict resolution over a raw dependency tree.
//!
//! The visitor records a node's artifact only after its whole subtree has
//! been walked. For every coordinate it keeps the highest version seen
//! anywhere in the tree; equal versions keep the artifact recorded first.

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::{debug, trace};

use super::node::{DependencyNode, DependencyVisitor};
use crate::model::{Artifact, Coordinate};

#[derive(Debug, Default)]
pub struct BottomUpVisitor {
    artifacts: IndexMap<Coordinate, Artifact>,
}

impl BottomUpVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `artifact` under its coordinate unless an equal or higher
    /// version is already stored. A replacement keeps the slot of the first
    /// encounter.
    pub fn record(&mut self, artifact: &Artifact) {
        match self.artifacts.entry(artifact.coordinate.clone()) {
            Entry::Vacant(slot) => {
                trace!("Recording {}", artifact);
                slot.insert(artifact.clone());
            }
            Entry::Occupied(mut slot) => {
                if slot.get().version < artifact.version {
                    debug!(
                        "Version conflict on {}: {} replaces {}",
                        artifact.coordinate,
                        artifact.version,
                        slot.get().version
                    );
                    slot.insert(artifact.clone());
                } else {
                    trace!(
                        "Version conflict on {}: keeping {} over {}",
                        artifact.coordinate,
                        slot.get().version,
                        artifact.version
                    );
                }
            }
        }
    }

    pub fn into_resolved(self) -> ResolvedArtifacts {
        ResolvedArtifacts {
            artifacts: self.artifacts,
        }
    }
}

impl DependencyVisitor for BottomUpVisitor {
    fn leave(&mut self, node: &DependencyNode) -> bool {
        self.record(node.artifact());
        true
    }
}

/// Walks `root` bottom-up and returns the winning artifact per coordinate.
pub fn collect_resolved(root: &DependencyNode) -> ResolvedArtifacts {
    let mut visitor = BottomUpVisitor::new();
    root.accept(&mut visitor);
    visitor.into_resolved()
}

/// Snapshot of the visitor's result, ordered by first encounter. There is
/// no way to change an entry; `without` produces a new snapshot.
#[derive(Debug, Clone, Default)]
pub struct ResolvedArtifacts {
    artifacts: IndexMap<Coordinate, Artifact>,
}

impl ResolvedArtifacts {
    pub fn get(&self, coordinate: &Coordinate) -> Option<&Artifact> {
        self.artifacts.get(coordinate)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    /// Drops `coordinate`, keeping the order of the remaining entries.
    pub fn without(mut self, coordinate: &Coordinate) -> Self {
        self.artifacts.shift_remove(coordinate);
        self
    }
}

impl IntoIterator for ResolvedArtifacts {
    type Item = Artifact;
    type IntoIter = indexmap::map::IntoValues<Coordinate, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.into_values()
    }
}
