pub mod filter;
pub mod graph;
pub mod node;
pub mod tree;
pub mod visitor;

pub use filter::{
    AcceptAll, AndFilter, ArtifactFilter, ArtifactPattern, ExcludesFilter, IncludesFilter,
    OptionalFilter, TypeFilter,
};
pub use graph::{GraphBuilder, GraphRequest, GraphTransform, ProjectContext};
pub use node::{DependencyNode, DependencyVisitor};
pub use tree::{GraphNode, LegacyNode};
pub use visitor::{collect_resolved, BottomUpVisitor, ResolvedArtifacts};
