use std::path::Path;

use exn::ResultExt;
use tankobon_storage::StorageBackend;

use crate::error::{ErrorKind, Result};

/// Identifiers embedded in the archive comment of the file at `path`.
pub fn read_identifiers(backend: &dyn StorageBackend, path: &Path) -> Result<Vec<String>> {
    let bytes = backend.read(path).or_raise(|| ErrorKind::Storage)?;
    tankobon_archive::identifiers(&bytes).or_raise(|| ErrorKind::Archive(path.to_path_buf()))
}

pub fn shares_identifier(a: &[String], b: &[String]) -> bool {
    a.iter().any(|identifier| b.contains(identifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shares_identifier() {
        let a = vec!["isbn:9781".to_string(), "uuid:abc".to_string()];
        let b = vec!["uuid:abc".to_string()];
        assert!(shares_identifier(&a, &b));
        assert!(!shares_identifier(&a, &[]));
    }
}
