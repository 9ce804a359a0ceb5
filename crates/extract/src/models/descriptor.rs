use super::{FileType, Number, ReleaseFile, ReleaseNumber};

/// The structured form of a [`ReleaseFile`], derived from its name.
///
/// Descriptors are never mutated after a rename. Build a new one from the
/// new [`ReleaseFile`] instead.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReleaseDescriptor {
    pub file: ReleaseFile,
    /// Bracket-stripped series name; never empty.
    pub series_name: String,
    /// `None` when no number could be parsed from the name.
    pub number: Option<ReleaseNumber>,
    /// Sub-part of a single volume (`Part 2`), or the `x2`/`#2` suffix of a chapter.
    pub part: Option<Number>,
    pub year: Option<u16>,
    pub release_group: Option<String>,
    /// Bracketed edition/metadata tags, de-duplicated, Premium first.
    pub extras: Vec<String>,
    pub is_one_shot: bool,
}
impl ReleaseDescriptor {
    pub fn file_type(&self) -> FileType {
        self.file.file_type
    }

    pub fn is_multi_volume(&self) -> bool {
        self.number.as_ref().is_some_and(ReleaseNumber::is_multi)
    }

    /// Human readable label, e.g. `Alpha v01` or `Beta c012.5`.
    pub fn label(&self) -> String {
        match &self.number {
            Some(number) => {
                let file_type = self.file_type();
                format!("{} {}", self.series_name, number.format(file_type.prefix(), file_type.width()))
            },
            None => self.series_name.clone(),
        }
    }
}
