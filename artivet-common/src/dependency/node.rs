// artivet-common/src/dependency/node.rs
use serde::{Deserialize, Serialize};

use crate::model::Artifact;

/// Callbacks for a depth-first walk over a dependency tree.
///
/// `enter` runs before a node's children, `leave` after all of them.
/// Returning `false` from `enter` skips the subtree; returning `false` from
/// `leave` stops visiting the remaining siblings.
pub trait DependencyVisitor {
    fn enter(&mut self, _node: &DependencyNode) -> bool {
        true
    }

    fn leave(&mut self, node: &DependencyNode) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyNode {
    artifact: Artifact,
    #[serde(default)]
    children: Vec<DependencyNode>,
}

impl DependencyNode {
    pub fn new(artifact: Artifact) -> Self {
        Self {
            artifact,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<DependencyNode>) -> Self {
        self.children = children;
        self
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn children(&self) -> &[DependencyNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<DependencyNode> {
        &mut self.children
    }

    /// Walks this node and its subtree. Returns `false` when the visitor
    /// asked to stop early.
    pub fn accept<V: DependencyVisitor + ?Sized>(&self, visitor: &mut V) -> bool {
        if visitor.enter(self) {
            for child in &self.children {
                if !child.accept(visitor) {
                    break;
                }
            }
        }
        visitor.leave(self)
    }

    /// Applies `f` to every artifact in the tree, root included.
    pub fn for_each_artifact_mut(&mut self, f: &mut impl FnMut(&mut Artifact)) {
        f(&mut self.artifact);
        for child in &mut self.children {
            child.for_each_artifact_mut(f);
        }
    }

    /// Number of nodes in the tree, root included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(DependencyNode::node_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        events: Vec<String>,
    }

    impl DependencyVisitor for Recorder {
        fn enter(&mut self, node: &DependencyNode) -> bool {
            self.events.push(format!("+{}", node.artifact().name()));
            true
        }

        fn leave(&mut self, node: &DependencyNode) -> bool {
            self.events.push(format!("-{}", node.artifact().name()));
            true
        }
    }

    fn node(name: &str, children: Vec<DependencyNode>) -> DependencyNode {
        DependencyNode::new(Artifact::new("g", name, "1.0")).with_children(children)
    }

    #[test]
    fn accept_leaves_children_before_parent() {
        let root = node(
            "root",
            vec![node("left", vec![node("leaf", vec![])]), node("right", vec![])],
        );
        let mut recorder = Recorder { events: Vec::new() };
        root.accept(&mut recorder);
        assert_eq!(
            recorder.events,
            ["+root", "+left", "+leaf", "-leaf", "-left", "+right", "-right", "-root"]
        );
        assert_eq!(root.node_count(), 4);
    }
}
