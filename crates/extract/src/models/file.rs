use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use exn::OptionExt;

use crate::error::{Error, ErrorKind, Result};

/// Archive container formats the library manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum Extension {
    /// Comic book archive (manga)
    Cbz,
    /// Plain zip archive of images (manga)
    Zip,
    /// EPUB container (light novel)
    Epub,
}
impl Extension {
    pub const ALL: [Extension; 3] = [Self::Cbz, Self::Zip, Self::Epub];

    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref().extension().and_then(|ext| ext.to_str()).and_then(|ext| ext.parse().ok())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cbz => "cbz",
            Self::Zip => "zip",
            Self::Epub => "epub",
        }
    }

    /// Image archives, as opposed to novels.
    pub fn is_manga(&self) -> bool {
        matches!(self, Self::Cbz | Self::Zip)
    }

    pub fn is_novel(&self) -> bool {
        matches!(self, Self::Epub)
    }

    /// Wraps a tag in the bracket style used by releases of this format:
    /// square brackets for novels, parentheses for manga.
    pub fn bracket(&self, tag: &str) -> String {
        match self {
            Self::Epub => format!("[{tag}]"),
            Self::Cbz | Self::Zip => format!("({tag})"),
        }
    }
}
impl FromStr for Extension {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "cbz" => Self::Cbz,
            "zip" => Self::Zip,
            "epub" => Self::Epub,
            _ => exn::bail!(ErrorKind::UnsupportedExtension(s.to_string())),
        })
    }
}
impl Display for Extension {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a release is a whole volume or a single chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum FileType {
    Volume,
    Chapter,
}
impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Volume => "volume",
            Self::Chapter => "chapter",
        }
    }

    /// Prefix used when spelling the number in a file name (`v01`, `c001`).
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Volume => "v",
            Self::Chapter => "c",
        }
    }

    /// Zero-padding width of the number in a file name.
    pub fn width(&self) -> usize {
        match self {
            Self::Volume => 2,
            Self::Chapter => 3,
        }
    }
}
impl Display for FileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// One physical archive on disk.
///
/// Built fresh on every scan; after a rename a new [`ReleaseFile`] is built
/// for the new path rather than mutating the old one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReleaseFile {
    pub name: String,
    pub extensionless_name: String,
    pub extension: Extension,
    /// Containing directory
    pub root: PathBuf,
    pub path: PathBuf,
    pub file_type: FileType,
}
impl ReleaseFile {
    /// Splits a path into the name parts of a release file. The caller is
    /// responsible for the [`FileType`] classification.
    pub fn new(path: impl Into<PathBuf>, file_type: FileType) -> Result<Self> {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_raise(|| ErrorKind::MissingField("file_name"))?;
        let extension = match Extension::from_path(&path) {
            Some(ext) => ext,
            None => exn::bail!(ErrorKind::UnsupportedExtension(name)),
        };
        let extensionless_name = match name.rfind('.') {
            Some(dot) => name[..dot].to_string(),
            None => name.clone(),
        };
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self {
            name,
            extensionless_name,
            extension,
            root,
            path,
            file_type,
        })
    }
}
