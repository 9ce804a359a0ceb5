//! In-memory storage backend for testing.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use time::UtcDateTime;

use crate::StorageBackend;
use crate::error::{ErrorKind, Result};
use crate::models::{Directory, FileInfo};
use crate::path::validate as validate_path;

#[derive(Default)]
struct State {
    files: BTreeMap<PathBuf, (UtcDateTime, Vec<u8>)>,
    directories: BTreeSet<PathBuf>,
}
impl State {
    fn insert_file(&mut self, path: PathBuf, data: Vec<u8>) {
        self.insert_directory(path.parent().map(Path::to_path_buf).unwrap_or_default());
        self.files.insert(path, (UtcDateTime::now(), data));
    }

    /// Registers a directory and all of its ancestors.
    fn insert_directory(&mut self, path: PathBuf) {
        for ancestor in path.ancestors() {
            if ancestor.parent().is_none() || !self.directories.insert(ancestor.to_path_buf()) {
                break;
            }
        }
    }
}

/// In-memory storage backend for testing.
///
/// Files live in a sorted map behind a [`RwLock`], so all trait methods
/// operate on `&self`. Directories exist when they are registered explicitly
/// or contain a file, and outlive the files moved out of them.
///
/// # Examples
///
/// ```
/// use tankobon_storage::backend::{MockBackend, StorageBackend};
/// use std::path::Path;
///
/// let backend = MockBackend::with_files([
///     ("/library/Alpha/Alpha v01.cbz", b"archive"),
/// ]);
/// assert!(backend.exists(Path::new("/library/Alpha")).unwrap());
///
/// backend.write(Path::new("/downloads/Alpha v02.cbz"), b"data...").unwrap();
/// assert!(backend.exists(Path::new("/downloads/Alpha v02.cbz")).unwrap());
/// ```
pub struct MockBackend {
    name: String,
    state: RwLock<State>,
}

impl MockBackend {
    /// Create a mock backend pre-populated with files.
    ///
    /// Panics if any path fails validation. If test setup is wrong, then the
    /// test should not pass.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        let mut state = State::default();
        for (path, data) in files {
            let path = path.into();
            let Ok(validated) = validate_path(&path) else {
                panic!("MockBackend::with_files: invalid path {}", path.display());
            };
            state.insert_file(validated, data.into());
        }
        Self {
            name: "mock".to_string(),
            state: RwLock::new(state),
        }
    }

    /// Registers empty directories, such as a library root with no series.
    pub fn with_directories(self, directories: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        {
            let mut state = self.state_mut();
            for directory in directories {
                let directory = directory.into();
                let Ok(validated) = validate_path(&directory) else {
                    panic!("MockBackend::with_directories: invalid path {}", directory.display());
                };
                state.insert_directory(validated);
            }
        }
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Every file currently stored, sorted by path.
    pub fn files(&self) -> Vec<PathBuf> {
        self.state().files.keys().cloned().collect()
    }

    fn state(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let files: [(&str, &[u8]); 0] = [];
        Self::with_files(files)
    }
}

impl StorageBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_dir(&self, path: &Path) -> Result<Directory> {
        let path = validate_path(path)?;
        let state = self.state();
        if !state.directories.contains(&path) {
            exn::bail!(ErrorKind::NotFound(path));
        }
        let mut directory = Directory::new(&path);
        directory.directories = state.directories.iter().filter(|d| d.parent() == Some(path.as_path())).cloned().collect();
        directory.files = state
            .files
            .iter()
            .filter(|(f, _)| f.parent() == Some(path.as_path()))
            .map(|(f, (modified, data))| FileInfo::new(f, data.len() as u64, *modified))
            .collect();
        Ok(directory)
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        let path = validate_path(path)?;
        let state = self.state();
        Ok(state.files.contains_key(&path) || state.directories.contains(&path))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let path = validate_path(path)?;
        let state = self.state();
        let (_modified, data) = state.files.get(&path).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(path.clone())))?;
        Ok(data.clone())
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let path = validate_path(path)?;
        self.state_mut().insert_file(path, data.to_vec());
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<()> {
        let path = validate_path(path)?;
        self.state_mut().files.remove(&path).map(|_| ()).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(path)))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let from = validate_path(from)?;
        let to = validate_path(to)?;
        let mut state = self.state_mut();
        if state.files.contains_key(&to) || state.directories.contains(&to) {
            exn::bail!(ErrorKind::AlreadyExists(to));
        }
        let (_modified, data) = state.files.remove(&from).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(from)))?;
        state.insert_file(to, data);
        Ok(())
    }

    fn stat(&self, path: &Path) -> Result<FileInfo> {
        let path = validate_path(path)?;
        let state = self.state();
        let (modified, data) = state.files.get(&path).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(path.clone())))?;
        Ok(FileInfo::new(&path, data.len() as u64, *modified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> MockBackend {
        MockBackend::with_files([
            ("/library/Alpha/Alpha v01.cbz", b"one".to_vec()),
            ("/library/Alpha/Alpha v02.cbz", b"two".to_vec()),
            ("/downloads/Beta c005.cbz", b"chapter".to_vec()),
        ])
        .with_directories(["/library/Empty"])
    }

    #[test]
    fn test_read_dir_lists_one_level() {
        let backend = backend();
        let library = backend.read_dir(Path::new("/library")).unwrap();
        assert_eq!(library.directories, vec![PathBuf::from("/library/Alpha"), PathBuf::from("/library/Empty")]);
        assert!(library.files.is_empty());
        let alpha = backend.read_dir(Path::new("/library/Alpha")).unwrap();
        assert_eq!(alpha.files.len(), 2);
        assert_eq!(alpha.path, Path::new("/library/Alpha"));
    }

    #[test]
    fn test_walk_matches_tree() {
        let walked = backend().walk(Path::new("/library")).unwrap();
        let paths: Vec<_> = walked.iter().map(|d| d.path.to_str().unwrap().to_string()).collect();
        assert_eq!(paths, vec!["/library", "/library/Alpha", "/library/Empty"]);
    }

    #[test]
    fn test_rename_moves_between_trees() {
        let backend = backend();
        backend.rename(Path::new("/downloads/Beta c005.cbz"), Path::new("/library/Beta/Beta c005.cbz")).unwrap();
        assert_eq!(backend.read(Path::new("/library/Beta/Beta c005.cbz")).unwrap(), b"chapter");
        // The emptied source directory stays behind.
        assert!(backend.read_dir(Path::new("/downloads")).unwrap().is_empty());
    }

    #[test]
    fn test_rename_refuses_overwrite() {
        let err = backend()
            .rename(Path::new("/library/Alpha/Alpha v01.cbz"), Path::new("/library/Alpha/Alpha v02.cbz"))
            .unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(_)));
    }

    #[test]
    fn test_missing_paths() {
        let backend = backend();
        assert!(backend.read(Path::new("/nope.cbz")).unwrap_err().is_not_found());
        assert!(backend.delete(Path::new("/nope.cbz")).unwrap_err().is_not_found());
        assert!(backend.read_dir(Path::new("/nope")).unwrap_err().is_not_found());
    }
}
