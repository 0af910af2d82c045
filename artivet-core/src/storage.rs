// artivet-core/src/storage.rs
use std::path::Path;

use artivet_common::error::{ArtivetError, Result};
use artivet_common::model::Artifact;
use artivet_common::repository::ArtifactStorage;
use tracing::{debug, warn};

/// Storage backed by the local filesystem. Purging an artifact removes the
/// whole directory holding its file, so that sidecar files written next to
/// it during the same download go too.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl ArtifactStorage for LocalStorage {
    fn file_len(&self, path: &Path) -> Result<u64> {
        artivet_aio::file_len(path)
    }

    fn purge(&self, artifact: &Artifact, file: &Path) -> Result<()> {
        let dir = file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or_else(|| {
                ArtivetError::IoError(format!(
                    "Cannot purge {artifact}: {} has no parent directory",
                    file.display()
                ))
            })?;
        warn!("Purging {} for {}", dir.display(), artifact);
        if !artivet_aio::remove_directory_if_exists(dir)? {
            debug!("Nothing left to purge for {}", artifact);
        }
        Ok(())
    }
}
