//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a library failure.
///
/// Nearly all of these are per-file: the orchestration records them in the
/// [`RunReport`](crate::report::RunReport) and moves on to the next file.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("issue with path generation from template")]
    Template,
    /// A read, write, rename or delete failed.
    #[display("storage operation failed")]
    Storage,
    /// The archive could not be opened.
    #[display("unreadable archive: {}", _0.display())]
    Archive(#[error(not(source))] PathBuf),
    /// A ranked keyword is not a valid regular expression.
    #[display("invalid ranked keyword pattern: {_0}")]
    InvalidKeyword(#[error(not(source))] String),
    /// The parser rejected the configured vocabulary.
    #[display("invalid vocabulary")]
    Vocabulary,
    /// A move target is already occupied by a different file.
    #[display("target already exists: {}", _0.display())]
    Conflict(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Destructive operations are never retried by the library itself.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_storage_is_retryable() {
        assert!(ErrorKind::Storage.is_retryable());
        assert!(!ErrorKind::Conflict(PathBuf::from("/library/Alpha/Alpha v01.cbz")).is_retryable());
        assert!(!ErrorKind::Archive(PathBuf::from("/downloads/Alpha v01.cbz")).is_retryable());
    }
}
