//! Read-only storage backend, used for dry runs.

use std::path::Path;

use crate::models::{Directory, FileInfo};
use crate::{BackendHandle, StorageBackend, error::Result};

/// Read-only storage backend.
///
/// Wraps another backend and silently drops all write operations, logging an
/// [`info event`](tracing::Event) for each one.
#[derive(Clone)]
pub struct ReadOnlyBackend {
    inner: BackendHandle,
}
impl ReadOnlyBackend {
    pub fn new(inner: BackendHandle) -> Self {
        Self { inner }
    }
}

impl StorageBackend for ReadOnlyBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn read_dir(&self, path: &Path) -> Result<Directory> {
        self.inner.read_dir(path)
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        self.inner.exists(path)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.inner.read(path)
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        tracing::info!(path = %path.display(), bytes = data.len(), "Skipping write during read-only mode");
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<()> {
        tracing::info!(path = %path.display(), "Skipping delete during read-only mode");
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        tracing::info!(from = %from.display(), to = %to.display(), "Skipping rename/move during read-only mode");
        Ok(())
    }

    fn stat(&self, path: &Path) -> Result<FileInfo> {
        self.inner.stat(path)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend::LocalBackend;

    #[test]
    fn test_mutations_are_dropped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("Alpha v01.cbz");
        std::fs::write(&file, b"data").unwrap();
        let backend = ReadOnlyBackend::new(Arc::new(LocalBackend::new("local")));

        backend.delete(&file).unwrap();
        backend.rename(&file, &temp_dir.path().join("moved.cbz")).unwrap();
        backend.write(&temp_dir.path().join("new.cbz"), b"new").unwrap();

        assert_eq!(backend.read(&file).unwrap(), b"data");
        assert!(!backend.exists(&temp_dir.path().join("moved.cbz")).unwrap());
        assert!(!backend.exists(&temp_dir.path().join("new.cbz")).unwrap());
    }
}
