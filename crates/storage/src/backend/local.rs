//! Local filesystem storage backend.

use std::fs::{self, Metadata};
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use crate::error::{ErrorKind, Result};
use crate::models::{Directory, FileInfo};
use crate::{StorageBackend, path::validate as validate_path};

/// Local filesystem storage backend.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tankobon_storage::backend::{LocalBackend, StorageBackend};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = LocalBackend::new("local");
/// let library = backend.read_dir(Path::new("/srv/manga"))?;
/// println!("{} series", library.directories.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocalBackend {
    name: String,
}
impl LocalBackend {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn file_info(path: &Path, metadata: &Metadata) -> Result<FileInfo> {
        let modified = metadata.modified().map_err(ErrorKind::Io)?;
        Ok(FileInfo::new(path, metadata.len(), modified.into()))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            IoErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            IoErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            IoErrorKind::AlreadyExists => ErrorKind::AlreadyExists(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

impl StorageBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_dir(&self, path: &Path) -> Result<Directory> {
        let path = validate_path(path)?;
        let mut directory = Directory::new(&path);
        for entry in fs::read_dir(&path).map_err(|e| Self::map_io_error(e, &path))? {
            let entry = entry.map_err(|e| Self::map_io_error(e, &path))?;
            let entry_path = entry.path();
            // Follows symlinks; a broken one fails here and is dropped.
            let Ok(metadata) = fs::metadata(&entry_path) else {
                tracing::debug!(path = %entry_path.display(), "Skipping unreadable directory entry");
                continue;
            };
            if metadata.is_dir() {
                directory.directories.push(entry_path);
            } else if metadata.is_file() {
                directory.files.push(Self::file_info(&entry_path, &metadata)?);
            }
        }
        directory.directories.sort();
        directory.files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(directory)
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        let path = validate_path(path)?;
        Ok(fs::exists(&path).map_err(ErrorKind::Io)?)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let path = validate_path(path)?;
        Ok(fs::read(&path).map_err(|e| Self::map_io_error(e, &path))?)
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let path = validate_path(path)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::map_io_error(e, parent))?;
        }
        Ok(fs::write(&path, data).map_err(|e| Self::map_io_error(e, &path))?)
    }

    fn delete(&self, path: &Path) -> Result<()> {
        let path = validate_path(path)?;
        Ok(fs::remove_file(&path).map_err(|e| Self::map_io_error(e, &path))?)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let from = validate_path(from)?;
        let to = validate_path(to)?;
        if fs::exists(&to).map_err(ErrorKind::Io)? {
            exn::bail!(ErrorKind::AlreadyExists(to));
        }
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::map_io_error(e, parent))?;
        }
        Ok(fs::rename(&from, &to).map_err(|e| Self::map_io_error(e, &from))?)
    }

    fn stat(&self, path: &Path) -> Result<FileInfo> {
        let path = validate_path(path)?;
        let metadata = fs::metadata(&path).map_err(|e| Self::map_io_error(e, &path))?;
        Self::file_info(&path, &metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, LocalBackend) {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("Alpha")).unwrap();
        fs::write(temp_dir.path().join("Alpha/Alpha v01.cbz"), b"one").unwrap();
        fs::write(temp_dir.path().join("Alpha/Alpha v02.cbz"), b"two").unwrap();
        fs::write(temp_dir.path().join("Beta c005.cbz"), b"chapter").unwrap();
        (temp_dir, LocalBackend::new("local"))
    }

    #[test]
    fn test_read_dir() {
        let (temp_dir, backend) = setup();
        let root = backend.read_dir(temp_dir.path()).unwrap();
        assert_eq!(root.directories, vec![temp_dir.path().join("Alpha")]);
        assert_eq!(root.files.len(), 1);
        assert_eq!(root.files[0].name(), "Beta c005.cbz");
        assert_eq!(root.files[0].size, 7);
    }

    #[test]
    fn test_walk_is_depth_first() {
        let (temp_dir, backend) = setup();
        let walked = backend.walk(temp_dir.path()).unwrap();
        let paths: Vec<_> = walked.iter().map(|d| d.path.clone()).collect();
        assert_eq!(paths, vec![temp_dir.path().to_path_buf(), temp_dir.path().join("Alpha")]);
        assert_eq!(walked[1].files.len(), 2);
    }

    #[test]
    fn test_missing_directory() {
        let (temp_dir, backend) = setup();
        let err = backend.read_dir(&temp_dir.path().join("Missing")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_rename_creates_parents_and_refuses_overwrite() {
        let (temp_dir, backend) = setup();
        let from = temp_dir.path().join("Beta c005.cbz");
        let to = temp_dir.path().join("Beta/Beta c005.cbz");
        backend.rename(&from, &to).unwrap();
        assert!(!backend.exists(&from).unwrap());
        assert_eq!(backend.read(&to).unwrap(), b"chapter");

        let err = backend
            .rename(&temp_dir.path().join("Alpha/Alpha v01.cbz"), &temp_dir.path().join("Alpha/Alpha v02.cbz"))
            .unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(_)));
    }

    #[test]
    fn test_write_delete_and_hash() {
        let (temp_dir, backend) = setup();
        let path = temp_dir.path().join("Gamma/cover.jpg");
        backend.write(&path, b"image").unwrap();
        assert_eq!(backend.hash(&path).unwrap(), blake3::hash(b"image").to_string());
        assert_eq!(backend.stat(&path).unwrap().size, 5);
        backend.delete(&path).unwrap();
        assert!(!backend.exists(&path).unwrap());
        assert!(backend.delete(&path).unwrap_err().is_not_found());
    }

    #[test]
    fn test_relative_paths_rejected() {
        let backend = LocalBackend::new("local");
        let err = backend.read(Path::new("relative/file.cbz")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }
}
