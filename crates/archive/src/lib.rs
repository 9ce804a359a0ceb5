//! Read-only access to the zip containers behind `.cbz`, `.zip` and `.epub`
//! releases.
//!
//! Archives are handed over as bytes already read by the storage layer, so
//! this crate never touches the filesystem:
//!
//! - [`identifiers`] reads the ISBN/series identifiers embedded in the
//!   archive comment after an `Identifiers:` marker
//! - [`find_cover`] picks the image most likely to be the cover

mod cover;
pub mod error;

use std::io::Cursor;

use exn::ResultExt;
use tracing::instrument;
use zip::ZipArchive;

pub use crate::cover::{Cover, ImageFormat, find_cover, natural_cmp};
use crate::error::{ErrorKind, Result};

const IDENTIFIERS_MARKER: &[u8] = b"Identifiers:";

pub(crate) fn open(bytes: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>> {
    ZipArchive::new(Cursor::new(bytes)).or_raise(|| ErrorKind::Corrupt)
}

/// Returns the identifiers stored in the archive comment, lowercased.
///
/// The comment conventionally reads `...Identifiers: isbn:978..., uuid:...`;
/// everything after the marker is split on commas. No marker means no
/// identifiers, which is not an error.
#[instrument(level = "debug", skip(bytes), fields(size = bytes.len()))]
pub fn identifiers(bytes: &[u8]) -> Result<Vec<String>> {
    let archive = open(bytes)?;
    Ok(parse_identifiers(archive.comment()))
}

fn parse_identifiers(comment: &[u8]) -> Vec<String> {
    let Some(position) = memchr::memmem::find(comment, IDENTIFIERS_MARKER) else {
        return Vec::new();
    };
    String::from_utf8_lossy(&comment[position + IDENTIFIERS_MARKER.len()..])
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use rstest::rstest;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use super::*;

    /// Builds an in-memory zip holding `entries`, with an optional comment.
    pub(crate) fn build_zip(entries: &[(&str, &[u8])], comment: Option<&str>) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        if let Some(comment) = comment {
            writer.set_comment(comment);
        }
        writer.finish().unwrap().into_inner()
    }

    #[rstest]
    #[case("Identifiers: ISBN:9781234567890, uuid:ABC", &["isbn:9781234567890", "uuid:abc"])]
    #[case("Tagged by tool. Identifiers:isbn:1,,  ", &["isbn:1"])]
    #[case("No markers here", &[])]
    #[case("", &[])]
    fn test_parse_identifiers(#[case] comment: &str, #[case] expected: &[&str]) {
        assert_eq!(parse_identifiers(comment.as_bytes()), expected);
    }

    #[test]
    fn test_identifiers_from_archive() {
        let bytes = build_zip(&[("001.jpg", b"image")], Some("Identifiers: isbn:42"));
        assert_eq!(identifiers(&bytes).unwrap(), vec!["isbn:42"]);
    }

    #[test]
    fn test_identifiers_rejects_garbage() {
        let err = identifiers(b"definitely not a zip").unwrap_err();
        assert_eq!(*err, ErrorKind::Corrupt);
    }
}
