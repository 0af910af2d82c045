// artivet-common/src/repository.rs
//! On-disk repository layout and the two file-level collaborators of the
//! resolver: where an artifact comes from and how its file is inspected.
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::Artifact;

/// Materializes an artifact's file from its coordinates.
pub trait ArtifactResolver {
    fn resolve_artifact(&self, artifact: &Artifact) -> Result<PathBuf>;
}

/// File inspection and cleanup for downloaded artifacts.
pub trait ArtifactStorage {
    fn file_len(&self, path: &Path) -> Result<u64>;

    /// Forgets everything downloaded for `artifact`, whose file is `file`,
    /// so that the next resolution starts from scratch.
    fn purge(&self, artifact: &Artifact, file: &Path) -> Result<()>;
}

/// `root/<group as path>/<name>/<version>/<name>-<version>[-<classifier>].<ext>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the artifact relative to any repository root, `/` separated.
    pub fn relative_path(artifact: &Artifact) -> String {
        let mut file_name = format!("{}-{}", artifact.name(), artifact.version);
        if let Some(classifier) = &artifact.classifier {
            file_name.push('-');
            file_name.push_str(classifier);
        }
        file_name.push('.');
        file_name.push_str(extension_for(&artifact.kind));
        format!(
            "{}/{}/{}/{}",
            artifact.group().replace('.', "/"),
            artifact.name(),
            artifact.version,
            file_name
        )
    }

    pub fn artifact_path(&self, artifact: &Artifact) -> PathBuf {
        Self::relative_path(artifact)
            .split('/')
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}

/// Packaging types whose files are plain jars.
fn extension_for(kind: &str) -> &str {
    match kind {
        "test-jar" | "maven-plugin" | "bundle" | "ejb" | "ejb-client" | "java-source"
        | "javadoc" => "jar",
        other => other,
    }
}
