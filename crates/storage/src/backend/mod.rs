//! Storage backend trait and implementations.
//!
//! This module defines the `StorageBackend` trait, the single seam through
//! which the organizer reads directories and archives and issues its
//! rename/move/delete requests.

mod local;
#[cfg(feature = "mock")]
mod mock;
mod ro;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
pub use self::ro::ReadOnlyBackend;
use crate::error::Result;
use crate::models::{Directory, FileInfo};
use std::path::Path;

/// Unified interface for storage backends.
///
/// All operations are blocking and take absolute paths, validated with
/// [`validate_path`](crate::validate_path) by each implementation.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tankobon_storage::{backend::StorageBackend, error::Result};
///
/// fn archive_count(backend: &dyn StorageBackend, root: &Path) -> Result<usize> {
///     let count = backend
///         .walk(root)?
///         .iter()
///         .flat_map(|dir| &dir.files)
///         .filter(|file| file.name().ends_with(".cbz"))
///         .count();
///     Ok(count)
/// }
/// ```
pub trait StorageBackend: Send + Sync {
    /// Name of the configured backend, used for logging only.
    fn name(&self) -> &str;

    /// Lists the immediate contents of a directory.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the
    /// directory does not exist.
    fn read_dir(&self, path: &Path) -> Result<Directory>;

    /// Depth-first listing of `root` and every directory below it, parents
    /// before their children.
    ///
    /// A subdirectory that vanishes mid-walk is skipped; any other failure
    /// aborts the walk.
    fn walk(&self, root: &Path) -> Result<Vec<Directory>> {
        let mut stack = vec![root.to_path_buf()];
        let mut directories = Vec::new();
        while let Some(current) = stack.pop() {
            let directory = match self.read_dir(&current) {
                Ok(directory) => directory,
                Err(e) if e.is_not_found() && current != root => {
                    tracing::debug!(path = %current.display(), "Directory disappeared during walk");
                    continue;
                },
                Err(e) => return Err(e),
            };
            // Reversed so the stack pops subdirectories in sorted order.
            stack.extend(directory.directories.iter().rev().cloned());
            directories.push(directory);
        }
        Ok(directories)
    }

    /// Check if a file or directory exists.
    fn exists(&self, path: &Path) -> Result<bool>;

    /// Read file contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// BLAKE3 hash of a file's contents, hex-encoded.
    fn hash(&self, path: &Path) -> Result<String> {
        Ok(blake3::hash(&self.read(path)?).to_string())
    }

    /// Write file contents, creating parent directories as needed.
    ///
    /// Overwrites an existing file.
    fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Delete a file.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    fn delete(&self, path: &Path) -> Result<()>;

    /// Rename/move a file, creating the destination's parent directories.
    ///
    /// Returns [`AlreadyExists`](crate::error::ErrorKind::AlreadyExists) if
    /// the destination exists; nothing is ever overwritten by a move.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Get file metadata without reading contents.
    fn stat(&self, path: &Path) -> Result<FileInfo>;
}
