//! Path validation utilities.
//!
//! Every backend operation takes an absolute path. Relative paths are
//! rejected rather than resolved against the working directory, so a
//! misconfigured library root can never point somewhere unexpected.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates and normalizes an absolute storage path.
///
/// `.` components and duplicate separators are dropped and `..` is resolved
/// lexically. A path that is relative, empty, contains a null byte, or would
/// climb above the filesystem root is rejected.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tankobon_storage::validate_path;
/// // Valid paths
/// assert!(validate_path("/library/Alpha/Alpha v01.cbz").is_ok());
/// assert!(validate_path("/library/a/../Alpha").is_ok());
/// // Invalid paths
/// assert!(validate_path("library/Alpha").is_err());
/// assert!(validate_path("/../etc/passwd").is_err());
/// assert!(validate_path("/a\0b").is_err());
/// // Paths get resolved
/// assert_eq!(
///     validate_path("/library/wrong/.././Alpha//./v01.cbz/").unwrap(),
///     Path::new("/library/Alpha/v01.cbz")
/// );
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let original = path.as_ref();
    let invalid = || ErrorKind::InvalidPath(original.to_path_buf());
    if !original.has_root() {
        exn::bail!(invalid());
    }
    let mut normalized = PathBuf::from("/");
    let mut depth = 0usize;
    for component in original.components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(invalid());
                }
                normalized.push(s);
                depth += 1;
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::ParentDir => {
                if depth == 0 {
                    exn::bail!(invalid());
                }
                normalized.pop();
                depth -= 1;
            },
        }
    }
    if depth == 0 {
        exn::bail!(invalid());
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/library/Alpha/Alpha v01.cbz", "/library/Alpha/Alpha v01.cbz")]
    #[case("/library//Alpha//", "/library/Alpha")]
    #[case("/library/./Alpha/./v01.cbz", "/library/Alpha/v01.cbz")]
    #[case("/library/Alpha/..", "/library")]
    fn test_valid_paths(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate(input).unwrap(), Path::new(expected));
    }

    #[rstest]
    #[case("library/Alpha")]
    #[case("./Alpha")]
    #[case("")]
    #[case("/")]
    #[case("/..")]
    #[case("/library/../../etc")]
    #[case("/a\0b")]
    fn test_invalid_paths(#[case] input: &str) {
        let err = validate(input).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }
}
