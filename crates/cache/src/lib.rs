//! Persisted cache of library folders that previously matched a release.
//!
//! The cache is a flat file with one absolute folder path per line. It is
//! not the source of truth; deleting it only costs a full library walk on
//! the next run. Lines are only ever appended, and duplicates are skipped.
//!
//! In memory, entries are kept most-recently-matched first so a linear scan
//! finds likely candidates early.

pub mod error;

use std::path::{Path, PathBuf};

use exn::ResultExt;
use tankobon_storage::{StorageBackend, validate_path};
use tracing::instrument;

use crate::error::{ErrorKind, Result};

#[derive(Debug, Clone, Default)]
pub struct PathCache {
    file: Option<PathBuf>,
    entries: Vec<PathBuf>,
    /// Entries inserted since the last flush, in insertion order.
    pending: Vec<PathBuf>,
}

impl PathCache {
    /// An empty cache that is never persisted.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the cache file. A missing file is an empty cache.
    ///
    /// Entries that are not absolute paths, or that point inside one of
    /// `excluded_roots` (the download folders), are ignored.
    #[instrument(skip(backend, excluded_roots), fields(file = %file.display()))]
    pub fn load(backend: &dyn StorageBackend, file: &Path, excluded_roots: &[PathBuf]) -> Result<Self> {
        let mut cache = Self {
            file: Some(file.to_path_buf()),
            ..Self::default()
        };
        for line in read_lines(backend, file)? {
            let Ok(path) = validate_path(&line) else {
                tracing::warn!(entry = %line, "Ignoring invalid cache entry");
                continue;
            };
            if excluded_roots.iter().any(|root| path.starts_with(root)) {
                tracing::debug!(entry = %path.display(), "Ignoring cache entry inside a download folder");
                continue;
            }
            if !cache.entries.contains(&path) {
                cache.entries.push(path);
            }
        }
        tracing::debug!(entries = cache.entries.len(), "Loaded path cache");
        Ok(cache)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|entry| entry == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(PathBuf::as_path)
    }

    /// Entries in search order for `query`: folders whose name starts with
    /// the same letter as the query first, then the rest. Most recently
    /// matched order is kept within each group.
    pub fn candidates_for(&self, query: &str) -> Vec<&Path> {
        let initial = first_letter(query);
        let (mut likely, rest): (Vec<&Path>, Vec<&Path>) = self.iter().partition(|entry| {
            let name = entry.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            initial.is_some() && first_letter(name) == initial
        });
        likely.extend(rest);
        likely
    }

    /// Records a newly matched folder at the front. Returns `false` (and
    /// promotes it instead) if it was already cached.
    pub fn insert(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.contains(&path) {
            self.promote(&path);
            return false;
        }
        self.entries.insert(0, path.clone());
        self.pending.push(path);
        true
    }

    /// Moves an existing entry to the front.
    pub fn promote(&mut self, path: &Path) {
        if let Some(position) = self.entries.iter().position(|entry| entry == path) {
            let entry = self.entries.remove(position);
            self.entries.insert(0, entry);
        }
    }

    /// Drops an entry for the rest of the run, e.g. a folder that no longer
    /// exists. The cache file is append-only, so it is not rewritten.
    pub fn forget(&mut self, path: &Path) {
        self.entries.retain(|entry| entry != path);
        self.pending.retain(|entry| entry != path);
    }

    /// Appends entries inserted since the last flush to the cache file.
    /// Returns how many lines were written.
    #[instrument(skip_all)]
    pub fn flush(&mut self, backend: &dyn StorageBackend) -> Result<usize> {
        let Some(file) = self.file.as_deref() else {
            return Ok(0);
        };
        if self.pending.is_empty() {
            return Ok(0);
        }
        let mut lines = read_lines(backend, file)?;
        let mut appended = 0;
        for path in &self.pending {
            let line = path.to_string_lossy().into_owned();
            if !lines.contains(&line) {
                lines.push(line);
                appended += 1;
            }
        }
        if appended > 0 {
            let mut contents = lines.join("\n");
            contents.push('\n');
            backend.write(file, contents.as_bytes()).or_raise(|| ErrorKind::Storage(file.to_path_buf()))?;
        }
        tracing::debug!(appended, "Flushed path cache");
        self.pending.clear();
        Ok(appended)
    }
}

fn read_lines(backend: &dyn StorageBackend, file: &Path) -> Result<Vec<String>> {
    let bytes = match backend.read(file) {
        Ok(bytes) => bytes,
        Err(e) if e.is_not_found() => return Ok(Vec::new()),
        Err(e) => return Err(e).or_raise(|| ErrorKind::Storage(file.to_path_buf())),
    };
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn first_letter(s: &str) -> Option<char> {
    s.chars().find(|c| c.is_alphanumeric()).map(|c| c.to_lowercase().next().unwrap_or(c))
}
