// src/model/mod.rs
// Declares the modules within the model directory.
pub mod artifact;
pub mod coordinate;
pub mod version;

// Re-export
pub use artifact::Artifact;
pub use coordinate::Coordinate;
pub use version::Version;
