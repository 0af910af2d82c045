// artivet-core/src/lib.rs
//! Dependency resolution and validation: building the tree of a project,
//! picking a version per coordinate and checking every winning artifact
//! has a usable file on disk.

pub mod graph;
pub mod resolver;
pub mod storage;

pub use graph::{TreeDocumentBuilder, TreeFormat};
pub use resolver::{DependencyResolver, ResolutionContext};
pub use storage::LocalStorage;

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::fs;
    use std::path::PathBuf;

    use artivet_common::dependency::{AcceptAll, ProjectContext};
    use artivet_common::error::{ArtivetError, Result};
    use artivet_common::model::Artifact;
    use artivet_common::repository::{ArtifactResolver, LocalRepository};
    use serde_json::json;

    use super::*;

    /// Materializes artifacts straight into the local repository.
    struct RepoWriter {
        repository: LocalRepository,
        downloads: Cell<usize>,
    }

    impl ArtifactResolver for RepoWriter {
        fn resolve_artifact(&self, artifact: &Artifact) -> Result<PathBuf> {
            self.downloads.set(self.downloads.get() + 1);
            let path = self.repository.artifact_path(artifact);
            artivet_aio::atomic_write_file(&path, b"PK\x03\x04")?;
            Ok(path)
        }
    }

    fn setup() -> (tempfile::TempDir, PathBuf, LocalRepository) {
        let dir = tempfile::tempdir().unwrap();
        let document = dir.path().join("app.json");
        let tree = json!({
            "groupId": "org.acme", "artifactId": "app", "version": "1.0",
            "children": [
                { "groupId": "com.acme", "artifactId": "b1", "version": "1.0",
                  "children": [{ "groupId": "com.acme", "artifactId": "a", "version": "1.0" }] },
                { "groupId": "com.acme", "artifactId": "b2", "version": "1.0",
                  "children": [{ "groupId": "com.acme", "artifactId": "a", "version": "2.0" }] }
            ]
        });
        fs::write(&document, tree.to_string()).unwrap();
        let repository = LocalRepository::new(dir.path().join("m2"));
        (dir, document, repository)
    }

    fn resolve(
        document: &std::path::Path,
        repository: &LocalRepository,
        writer: &RepoWriter,
        attempts: i32,
    ) -> Result<artivet_common::dependency::DependencyNode> {
        let builder = TreeDocumentBuilder::new().with_repository(repository.clone());
        DependencyResolver::new(ResolutionContext {
            project: ProjectContext::from_descriptor(document),
            graph_builder: &builder,
            filter: &AcceptAll,
            artifact_resolver: writer,
            storage: &LocalStorage,
        })
        .resolve(attempts)
    }

    #[test]
    fn empty_local_copy_is_replaced_on_the_second_attempt() {
        let (_dir, document, repository) = setup();
        let winner = Artifact::new("com.acme", "a", "2.0");
        let stale = repository.artifact_path(&winner);
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, b"").unwrap();

        let writer = RepoWriter {
            repository: repository.clone(),
            downloads: Cell::new(0),
        };
        let root = resolve(&document, &repository, &writer, 2).unwrap();

        assert_eq!(fs::read(&stale).unwrap(), b"PK\x03\x04");
        // b1, b2 and a@2.0; a@1.0 lost the conflict and is never fetched.
        assert_eq!(writer.downloads.get(), 3);
        let a1 = Artifact::new("com.acme", "a", "1.0");
        assert!(!repository.artifact_path(&a1).exists());
        assert_eq!(
            root.children()[1].children()[0].artifact().file(),
            Some(stale.as_path())
        );
    }

    #[test]
    fn empty_local_copy_fails_a_single_attempt() {
        let (_dir, document, repository) = setup();
        let stale = repository.artifact_path(&Artifact::new("com.acme", "a", "2.0"));
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, b"").unwrap();

        let writer = RepoWriter {
            repository: repository.clone(),
            downloads: Cell::new(0),
        };
        let err = resolve(&document, &repository, &writer, 1).unwrap_err();
        assert!(matches!(err, ArtivetError::CorruptedArtifact { .. }));
        assert!(!stale.parent().unwrap().exists());
    }
}
