/*
File: artivet-aio/src/fs.rs
Purpose: Primitive synchronous filesystem operations.
*/
use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
    sync::Arc,
};

use artivet_common::error::{ArtivetError, Result};
use tempfile::NamedTempFile;
use tracing::{debug, error};

/// Checks if a path points to a regular file (resolving symlinks).
pub fn is_file(path: &Path) -> bool {
    path.is_file()
}

/// Returns the length in bytes of the file at `path`.
pub fn file_len(path: &Path) -> Result<u64> {
    fs::metadata(path).map(|m| m.len()).map_err(|e| {
        error!("Failed to stat {}: {}", path.display(), e);
        ArtivetError::from(e)
    })
}

/// Creates a directory and all its parent components if they are missing.
pub fn create_dir_all(path: &Path) -> Result<()> {
    debug!("Creating directory recursively: {}", path.display());
    fs::create_dir_all(path).map_err(|e| {
        error!("Failed create dir {}: {}", path.display(), e);
        ArtivetError::from(e)
    })
}

/// Removes a file.
pub fn remove_file(path: &Path) -> Result<()> {
    debug!("Removing file: {}", path.display());
    fs::remove_file(path).map_err(|e| {
        if e.kind() != io::ErrorKind::NotFound {
            error!("Failed remove file {}: {}", path.display(), e);
        }
        ArtivetError::from(e)
    })
}

/// Removes a directory and all its contents. A missing directory is not an
/// error. Returns whether anything was removed.
pub fn remove_directory_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => {
            debug!("Removed directory recursively: {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Directory already gone: {}", path.display());
            Ok(false)
        }
        Err(e) => {
            error!("Failed remove dir_all {}: {}", path.display(), e);
            Err(ArtivetError::from(e))
        }
    }
}

/// Streams `reader` into a temporary file next to `final_path` and renames
/// it into place once everything has been written. Returns the number of
/// bytes written. On failure nothing is left at `final_path`.
pub fn atomic_write_from_reader<R: Read + ?Sized>(final_path: &Path, reader: &mut R) -> Result<u64> {
    let dir = final_path.parent().ok_or_else(|| {
        ArtivetError::IoError(format!(
            "Cannot get parent directory for {}",
            final_path.display()
        ))
    })?;
    create_dir_all(dir)?;

    let mut temp_file = NamedTempFile::new_in(dir)?;
    debug!(
        "Writing {} via temp file {}",
        final_path.display(),
        temp_file.path().display()
    );

    let written = io::copy(reader, &mut temp_file).map_err(|e| {
        ArtivetError::IoError(format!(
            "Failed to write stream to {}: {}",
            temp_file.path().display(),
            e
        ))
    })?;
    temp_file.flush()?;
    temp_file.as_file().sync_all()?;

    let temp_path = temp_file.path().to_path_buf();
    temp_file.persist(final_path).map_err(|e| {
        error!(
            "Failed to persist temporary file {} over {}: {}",
            temp_path.display(),
            final_path.display(),
            e.error
        );
        ArtivetError::Io(Arc::new(e.error))
    })?;
    debug!("Wrote {} bytes to {}", written, final_path.display());
    Ok(written)
}

/// Atomically writes data to a file using a temporary file.
pub fn atomic_write_file(final_path: &Path, content: &[u8]) -> Result<()> {
    atomic_write_from_reader(final_path, &mut &content[..]).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_len_reports_size_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.jar");
        let full = dir.path().join("full.jar");
        fs::write(&empty, b"").unwrap();
        fs::write(&full, b"PK\x03\x04").unwrap();

        assert_eq!(file_len(&empty).unwrap(), 0);
        assert_eq!(file_len(&full).unwrap(), 4);
        assert!(matches!(
            file_len(&dir.path().join("missing.jar")),
            Err(ArtivetError::Io(_))
        ));
    }

    #[test]
    fn remove_directory_if_exists_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let version_dir = dir.path().join("g/a/1.0");
        fs::create_dir_all(&version_dir).unwrap();
        fs::write(version_dir.join("a-1.0.jar"), b"").unwrap();

        assert!(remove_directory_if_exists(&version_dir).unwrap());
        assert!(!version_dir.exists());
        assert!(!remove_directory_if_exists(&version_dir).unwrap());
    }

    #[test]
    fn atomic_write_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out.txt");

        atomic_write_file(&target, b"first").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"first");

        let written = atomic_write_from_reader(&target, &mut &b"second!"[..]).unwrap();
        assert_eq!(written, 7);
        assert_eq!(fs::read(&target).unwrap(), b"second!");
        assert_eq!(fs::read_dir(dir.path().join("nested")).unwrap().count(), 1);
    }
}
