use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::Read;
use std::path::Path;

use exn::ResultExt;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Image formats accepted as covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
}
impl ImageFormat {
    pub const ALL: [ImageFormat; 4] = [Self::Jpeg, Self::Png, Self::Webp, Self::Gif];

    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_lowercase();
        Some(match extension.as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "webp" => Self::Webp,
            "gif" => Self::Gif,
            _ => return None,
        })
    }

    /// Extension used when writing the cover out.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }
}
impl Display for ImageFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.extension())
    }
}

/// A cover image read out of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cover {
    /// Entry name inside the archive
    pub name: String,
    pub format: ImageFormat,
    pub data: Vec<u8>,
}

/// Compares names so that embedded numbers sort by value (`2.jpg` before
/// `10.jpg`). Non-numeric runs compare case-insensitively.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        match (a.chars().next(), b.chars().next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (digits_a, rest_a) = split_digits(a);
                let (digits_b, rest_b) = split_digits(b);
                let (trimmed_a, trimmed_b) = (digits_a.trim_start_matches('0'), digits_b.trim_start_matches('0'));
                let ordering = trimmed_a.len().cmp(&trimmed_b.len()).then_with(|| trimmed_a.cmp(trimmed_b));
                if ordering != Ordering::Equal {
                    return ordering;
                }
                (a, b) = (rest_a, rest_b);
            },
            (Some(x), Some(y)) => {
                let ordering = x.to_lowercase().cmp(y.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                (a, b) = (&a[x.len_utf8()..], &b[y.len_utf8()..]);
            },
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// Picks the cover of an archive.
///
/// An image whose file stem contains `cover` wins; otherwise the first image
/// in natural order is used. Returns `None` for archives without images.
#[instrument(level = "debug", skip(bytes), fields(size = bytes.len()))]
pub fn find_cover(bytes: &[u8]) -> Result<Option<Cover>> {
    let mut archive = crate::open(bytes)?;
    let mut images: Vec<(String, ImageFormat)> = archive
        .file_names()
        .filter_map(|name| ImageFormat::from_path(name).map(|format| (name.to_string(), format)))
        .collect();
    images.sort_by(|(a, _), (b, _)| natural_cmp(a, b));

    let is_cover = |name: &str| {
        Path::new(name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.to_lowercase().contains("cover"))
    };
    let Some((name, format)) = images.iter().find(|(name, _)| is_cover(name)).or(images.first()).cloned() else {
        tracing::debug!("Archive contains no images");
        return Ok(None);
    };

    let mut entry = archive.by_name(&name).or_raise(|| ErrorKind::Corrupt)?;
    let mut data = Vec::new();
    entry.read_to_end(&mut data).or_raise(|| ErrorKind::Io)?;
    tracing::debug!(entry = %name, %format, "Found cover image");
    Ok(Some(Cover { name, format, data }))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::tests::build_zip;

    #[rstest]
    #[case("2.jpg", "10.jpg", Ordering::Less)]
    #[case("page010.png", "page9.png", Ordering::Greater)]
    #[case("A.jpg", "a.jpg", Ordering::Equal)]
    #[case("001.jpg", "1.jpg", Ordering::Equal)]
    #[case("abc", "abcd", Ordering::Less)]
    fn test_natural_cmp(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(natural_cmp(a, b), expected);
    }

    #[rstest]
    #[case("x/cover.JPG", Some(ImageFormat::Jpeg))]
    #[case("x/001.jpeg", Some(ImageFormat::Jpeg))]
    #[case("x/001.webp", Some(ImageFormat::Webp))]
    #[case("x/content.opf", None)]
    #[case("x/noextension", None)]
    fn test_image_format(#[case] name: &str, #[case] expected: Option<ImageFormat>) {
        assert_eq!(ImageFormat::from_path(name), expected);
    }

    #[test]
    fn test_prefers_named_cover() {
        let bytes = build_zip(&[("001.jpg", b"first"), ("images/Cover.png", b"cover"), ("002.jpg", b"second")], None);
        let cover = find_cover(&bytes).unwrap().unwrap();
        assert_eq!(cover.name, "images/Cover.png");
        assert_eq!(cover.format, ImageFormat::Png);
        assert_eq!(cover.data, b"cover");
    }

    #[test]
    fn test_falls_back_to_natural_order() {
        let bytes = build_zip(&[("10.jpg", b"ten"), ("2.jpg", b"two"), ("info.txt", b"text")], None);
        let cover = find_cover(&bytes).unwrap().unwrap();
        assert_eq!(cover.name, "2.jpg");
        assert_eq!(cover.data, b"two");
    }

    #[test]
    fn test_no_images() {
        let bytes = build_zip(&[("mimetype", b"application/epub+zip")], None);
        assert_eq!(find_cover(&bytes).unwrap(), None);
    }
}
