// artivet-core/src/resolver.rs
//! The resolution pass: raw graph, bottom-up version selection, then a
//! file check for every winning artifact. A zero-length file aborts the
//! pass and, budget permitting, the whole pass runs again.
use std::collections::HashMap;
use std::path::Path;

use artivet_common::dependency::{
    collect_resolved, ArtifactFilter, DependencyNode, GraphBuilder, GraphRequest, ProjectContext,
};
use artivet_common::error::{ArtivetError, Result};
use artivet_common::model::{Artifact, Coordinate};
use artivet_common::repository::{ArtifactResolver, ArtifactStorage};
use tracing::{debug, error, info, instrument, warn};

/// Everything one resolution needs from the outside world.
pub struct ResolutionContext<'a> {
    pub project: ProjectContext,
    pub graph_builder: &'a dyn GraphBuilder,
    pub filter: &'a dyn ArtifactFilter,
    pub artifact_resolver: &'a dyn ArtifactResolver,
    pub storage: &'a dyn ArtifactStorage,
}

pub struct DependencyResolver<'a> {
    context: ResolutionContext<'a>,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(context: ResolutionContext<'a>) -> Self {
        Self { context }
    }

    pub fn project(&self) -> &ProjectContext {
        &self.context.project
    }

    /// Runs up to `max_attempts` passes and returns the root of the first
    /// one that finds no corrupted artifact. Only corruption is retried;
    /// when the budget runs out the last corruption error is returned.
    #[instrument(skip(self), fields(project = %self.context.project.name))]
    pub fn resolve(&self, max_attempts: i32) -> Result<DependencyNode> {
        if max_attempts < 1 {
            return Err(ArtivetError::InvalidArgument(format!(
                "max attempts must be at least 1, got {max_attempts}"
            )));
        }

        let mut attempt = 1;
        loop {
            debug!("Resolution attempt {}/{}", attempt, max_attempts);
            match self.resolve_once() {
                Ok(root) => {
                    info!(
                        "Resolved {} on attempt {}/{}",
                        self.context.project, attempt, max_attempts
                    );
                    return Ok(root);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!("Attempt {}/{} failed: {}. Retrying", attempt, max_attempts, e);
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_retryable() {
                        error!("Giving up after {} attempts: {}", max_attempts, e);
                    } else {
                        error!("Resolution of {} failed: {}", self.context.project, e);
                    }
                    return Err(e);
                }
            }
        }
    }

    /// A single pass, without any retry.
    pub fn resolve_once(&self) -> Result<DependencyNode> {
        let root = self.build_raw_graph()?;
        let root_coordinate = root.artifact().coordinate.clone();
        let resolved = collect_resolved(&root).without(&root_coordinate);
        debug!(
            "{} artifacts left to validate out of {} nodes",
            resolved.len(),
            root.node_count()
        );

        let mut validated = Vec::with_capacity(resolved.len());
        for artifact in resolved {
            validated.push(self.validate(artifact)?);
        }
        Ok(attach_files(root, &validated))
    }

    fn build_raw_graph(&self) -> Result<DependencyNode> {
        let request = GraphRequest::raw(self.context.project.clone());
        self.context
            .graph_builder
            .build_graph(&request, self.context.filter)
            .map_err(|e| match e {
                ArtivetError::GraphConstruction { .. } => e,
                other => ArtivetError::GraphConstruction {
                    project: self.context.project.to_string(),
                    message: other.to_string(),
                },
            })
    }

    fn validate(&self, mut artifact: Artifact) -> Result<Artifact> {
        match artifact.file().map(Path::to_path_buf) {
            None => {
                debug!("Resolving {}", artifact);
                let path = self
                    .context
                    .artifact_resolver
                    .resolve_artifact(&artifact)
                    .map_err(|e| ArtivetError::Resolution {
                        artifact: artifact.to_string(),
                        cause: e.to_string(),
                    })?;
                artifact.set_file(path);
            }
            Some(file) => {
                if self.context.storage.file_len(&file)? == 0 {
                    warn!("{} has an empty file at {}", artifact, file.display());
                    self.context.storage.purge(&artifact, &file)?;
                    return Err(ArtivetError::CorruptedArtifact {
                        artifact: artifact.to_string(),
                    });
                }
                debug!("{} already present at {}", artifact, file.display());
            }
        }
        Ok(artifact)
    }
}

/// Gives every node holding a winning release the file it was validated
/// with. Nodes that already carry a file keep it.
fn attach_files(mut root: DependencyNode, validated: &[Artifact]) -> DependencyNode {
    let winners: HashMap<&Coordinate, &Artifact> =
        validated.iter().map(|a| (&a.coordinate, a)).collect();
    root.for_each_artifact_mut(&mut |artifact| {
        let Some(winner) = winners.get(&artifact.coordinate) else {
            return;
        };
        if let Some(file) = winner.file().filter(|_| winner.same_release(artifact)) {
            artifact.set_file(file.to_path_buf());
        }
    });
    root
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::path::PathBuf;

    use artivet_common::dependency::{AcceptAll, GraphTransform};

    use super::*;
    use crate::storage::LocalStorage;

    /// Hands out whatever tree the script produces for the n-th call.
    struct ScriptedGraph<F: Fn(usize) -> Result<DependencyNode>> {
        calls: Cell<usize>,
        script: F,
    }

    impl<F: Fn(usize) -> Result<DependencyNode>> ScriptedGraph<F> {
        fn new(script: F) -> Self {
            Self {
                calls: Cell::new(0),
                script,
            }
        }
    }

    impl<F: Fn(usize) -> Result<DependencyNode>> GraphBuilder for ScriptedGraph<F> {
        fn build_graph(
            &self,
            request: &GraphRequest,
            _filter: &dyn ArtifactFilter,
        ) -> Result<DependencyNode> {
            assert_eq!(request.transform, GraphTransform::None);
            let n = self.calls.get();
            self.calls.set(n + 1);
            (self.script)(n)
        }
    }

    /// Writes a small file per requested artifact.
    struct FakeResolver {
        dir: PathBuf,
        requested: RefCell<Vec<String>>,
        fail: bool,
    }

    impl FakeResolver {
        fn new(dir: &Path) -> Self {
            Self {
                dir: dir.join("downloads"),
                requested: RefCell::new(Vec::new()),
                fail: false,
            }
        }
    }

    impl ArtifactResolver for FakeResolver {
        fn resolve_artifact(&self, artifact: &Artifact) -> Result<PathBuf> {
            self.requested.borrow_mut().push(artifact.to_string());
            if self.fail {
                return Err(ArtivetError::NotFound(artifact.to_string()));
            }
            let path = self
                .dir
                .join(format!("{}-{}.jar", artifact.name(), artifact.version));
            fs::create_dir_all(&self.dir).unwrap();
            fs::write(&path, b"PK").unwrap();
            Ok(path)
        }
    }

    #[derive(Default)]
    struct CountingStorage {
        purges: Cell<usize>,
    }

    impl ArtifactStorage for CountingStorage {
        fn file_len(&self, path: &Path) -> Result<u64> {
            LocalStorage.file_len(path)
        }

        fn purge(&self, artifact: &Artifact, file: &Path) -> Result<()> {
            self.purges.set(self.purges.get() + 1);
            LocalStorage.purge(artifact, file)
        }
    }

    fn a1() -> Artifact {
        Artifact::new("com.acme", "a1", "1.0")
    }

    fn root_with(children: Vec<DependencyNode>) -> DependencyNode {
        DependencyNode::new(Artifact::new("org.acme", "core", "1.0")).with_children(children)
    }

    fn write_jar(dir: &Path, artifact: &Artifact, content: &[u8]) -> PathBuf {
        let version_dir = dir
            .join("repo")
            .join(artifact.name())
            .join(artifact.version.as_str());
        fs::create_dir_all(&version_dir).unwrap();
        let path = version_dir.join(format!("{}.jar", artifact.name()));
        fs::write(&path, content).unwrap();
        path
    }

    fn run(
        graph: &dyn GraphBuilder,
        resolver: &FakeResolver,
        storage: &CountingStorage,
        attempts: i32,
    ) -> Result<DependencyNode> {
        DependencyResolver::new(ResolutionContext {
            project: ProjectContext::new("core", "core.json"),
            graph_builder: graph,
            filter: &AcceptAll,
            artifact_resolver: resolver,
            storage,
        })
        .resolve(attempts)
    }

    #[test]
    fn attempt_budget_below_one_is_rejected_up_front() {
        let dir = tempfile::tempdir().unwrap();
        let graph = ScriptedGraph::new(|_| Ok(root_with(vec![])));
        let resolver = FakeResolver::new(dir.path());
        let storage = CountingStorage::default();

        for attempts in [0, -1] {
            let err = run(&graph, &resolver, &storage, attempts).unwrap_err();
            assert!(matches!(err, ArtivetError::InvalidArgument(_)));
        }
        assert_eq!(graph.calls.get(), 0);
    }

    #[test]
    fn present_files_are_accepted_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let jar = write_jar(dir.path(), &a1(), b"PK\x03\x04");
        let tree = root_with(vec![DependencyNode::new(a1().with_file(&jar))]);
        let graph = ScriptedGraph::new(move |_| Ok(tree.clone()));
        let resolver = FakeResolver::new(dir.path());
        let storage = CountingStorage::default();

        let root = run(&graph, &resolver, &storage, 1).unwrap();
        assert_eq!(root.artifact().name(), "core");
        assert_eq!(root.children()[0].artifact().file(), Some(jar.as_path()));
        assert!(resolver.requested.borrow().is_empty());
        assert_eq!(storage.purges.get(), 0);
    }

    #[test]
    fn missing_files_are_resolved_onto_the_tree() {
        let dir = tempfile::tempdir().unwrap();
        let graph = ScriptedGraph::new(|_| {
            Ok(root_with(vec![
                DependencyNode::new(a1()),
                DependencyNode::new(Artifact::new("com.acme", "a2", "3.1")),
            ]))
        });
        let resolver = FakeResolver::new(dir.path());
        let storage = CountingStorage::default();

        let root = run(&graph, &resolver, &storage, 1).unwrap();
        assert_eq!(
            *resolver.requested.borrow(),
            vec!["com.acme:a1:jar:1.0:compile", "com.acme:a2:jar:3.1:compile"]
        );
        for child in root.children() {
            let file = child.artifact().file().unwrap();
            assert_eq!(fs::read(file).unwrap(), b"PK");
        }
    }

    #[test]
    fn root_is_never_validated() {
        let dir = tempfile::tempdir().unwrap();
        let graph = ScriptedGraph::new(|_| {
            Ok(root_with(vec![DependencyNode::new(Artifact::new(
                "org.acme", "core", "2.0",
            ))]))
        });
        let resolver = FakeResolver::new(dir.path());
        let storage = CountingStorage::default();

        run(&graph, &resolver, &storage, 1).unwrap();
        assert!(resolver.requested.borrow().is_empty());
    }

    #[test]
    fn only_the_highest_version_is_resolved() {
        let dir = tempfile::tempdir().unwrap();
        let a = |v: &str| DependencyNode::new(Artifact::new("com.acme", "a", v));
        let graph = ScriptedGraph::new(move |_| {
            Ok(root_with(vec![
                DependencyNode::new(Artifact::new("com.acme", "b1", "1.0"))
                    .with_children(vec![a("1.0")]),
                DependencyNode::new(Artifact::new("com.acme", "b2", "1.0"))
                    .with_children(vec![a("2.0")]),
            ]))
        });
        let resolver = FakeResolver::new(dir.path());
        let storage = CountingStorage::default();

        let root = run(&graph, &resolver, &storage, 1).unwrap();
        assert_eq!(
            *resolver.requested.borrow(),
            vec![
                "com.acme:a:jar:2.0:compile",
                "com.acme:b1:jar:1.0:compile",
                "com.acme:b2:jar:1.0:compile"
            ]
        );
        assert!(root.children()[0].children()[0].artifact().file().is_none());
        assert!(root.children()[1].children()[0].artifact().file().is_some());
    }

    #[test]
    fn empty_file_is_purged_and_retried_until_exhausted() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_path_buf();
        // The builder keeps reporting a fresh empty download every time.
        let graph = ScriptedGraph::new(move |_| {
            let jar = write_jar(&base, &a1(), b"");
            Ok(root_with(vec![DependencyNode::new(a1().with_file(jar))]))
        });
        let resolver = FakeResolver::new(dir.path());
        let storage = CountingStorage::default();

        let err = run(&graph, &resolver, &storage, 3).unwrap_err();
        assert!(matches!(err, ArtivetError::CorruptedArtifact { .. }));
        assert_eq!(
            err.to_string(),
            "Fail to download artifact com.acme:a1:jar:1.0:compile, size is 0"
        );
        assert_eq!(graph.calls.get(), 3);
        assert_eq!(storage.purges.get(), 3);
        assert!(!dir.path().join("repo/a1/1.0").exists());
    }

    #[test]
    fn retry_succeeds_once_the_file_is_gone() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_path_buf();
        let graph = ScriptedGraph::new(move |n| {
            let child = match n {
                0 => a1().with_file(write_jar(&base, &a1(), b"")),
                _ => a1(),
            };
            Ok(root_with(vec![DependencyNode::new(child)]))
        });
        let resolver = FakeResolver::new(dir.path());
        let storage = CountingStorage::default();

        let root = run(&graph, &resolver, &storage, 2).unwrap();
        assert_eq!(graph.calls.get(), 2);
        assert_eq!(storage.purges.get(), 1);
        assert_eq!(resolver.requested.borrow().len(), 1);
        assert!(root.children()[0].artifact().file().is_some());
        assert!(!dir.path().join("repo/a1/1.0").exists());
    }

    #[test]
    fn a_single_attempt_does_not_retry() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_path_buf();
        let graph = ScriptedGraph::new(move |_| {
            Ok(root_with(vec![DependencyNode::new(
                a1().with_file(write_jar(&base, &a1(), b"")),
            )]))
        });
        let resolver = FakeResolver::new(dir.path());
        let storage = CountingStorage::default();

        assert!(run(&graph, &resolver, &storage, 1).is_err());
        assert_eq!(graph.calls.get(), 1);
        assert_eq!(storage.purges.get(), 1);
    }

    #[test]
    fn resolution_failures_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let graph = ScriptedGraph::new(|_| Ok(root_with(vec![DependencyNode::new(a1())])));
        let mut resolver = FakeResolver::new(dir.path());
        resolver.fail = true;
        let storage = CountingStorage::default();

        let err = run(&graph, &resolver, &storage, 5).unwrap_err();
        assert_eq!(graph.calls.get(), 1);
        match err {
            ArtivetError::Resolution { artifact, .. } => {
                assert_eq!(artifact, "com.acme:a1:jar:1.0:compile")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn graph_failures_are_fatal_and_name_the_project() {
        let dir = tempfile::tempdir().unwrap();
        let graph = ScriptedGraph::new(|_| {
            Err(ArtivetError::NotFound("core.json".to_string()))
        });
        let resolver = FakeResolver::new(dir.path());
        let storage = CountingStorage::default();

        let err = run(&graph, &resolver, &storage, 4).unwrap_err();
        assert_eq!(graph.calls.get(), 1);
        assert!(matches!(err, ArtivetError::GraphConstruction { ref project, .. } if project == "core (core.json)"));
    }

    #[test]
    fn missing_file_on_disk_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("repo/a1/1.0/a1.jar");
        let graph = ScriptedGraph::new(move |_| {
            Ok(root_with(vec![DependencyNode::new(a1().with_file(&gone))]))
        });
        let resolver = FakeResolver::new(dir.path());
        let storage = CountingStorage::default();

        assert!(matches!(
            run(&graph, &resolver, &storage, 3),
            Err(ArtivetError::Io(_))
        ));
        assert_eq!(graph.calls.get(), 1);
        assert_eq!(storage.purges.get(), 0);
    }
}
