//! Configuration Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum ErrorKind {
    /// An explicitly requested configuration file does not exist.
    #[display("configuration file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The configuration sources could not be merged or deserialized.
    #[display("unable to load configuration")]
    Load,
    /// A configured path must be absolute.
    #[display("{field} must be an absolute path, found: {}", path.display())]
    RelativePath { field: &'static str, path: PathBuf },
    /// A numeric setting is outside its allowed range.
    #[display("{field} is out of range, found: {value}")]
    OutOfRange { field: &'static str, value: f64 },
    /// A keyword pattern is not a valid regular expression.
    #[display("invalid pattern in {field}: {pattern}")]
    InvalidPattern { field: &'static str, pattern: String },
    /// Neither download nor library paths are configured; nothing can run.
    #[display("no download or library paths configured")]
    NoPaths,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
