// artivet-common/src/lib.rs
pub mod config;
pub mod dependency;
pub mod error;
pub mod model;
pub mod repository;

// Re-export key types
pub use config::Config;
pub use dependency::{DependencyNode, ResolvedArtifacts};
pub use error::{ArtivetError, Result};
pub use model::{Artifact, Coordinate, Version};
pub use repository::{ArtifactResolver, ArtifactStorage, LocalRepository};
