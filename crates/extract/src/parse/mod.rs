//! Turns raw archive file names into [`ReleaseDescriptor`]s.

mod extras;
mod name;
mod number;
mod strategy;

use std::path::Path;

use exn::ResultExt;
use regex::Regex;
use tracing::instrument;

use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::models::{FileType, Number, ReleaseDescriptor, ReleaseFile, ReleaseNumber};
use crate::vocabulary::Vocabulary;

use self::strategy::Strategy;
pub use self::name::remove_brackets;

/// Where a file sits relative to its siblings. One-shot detection depends on
/// it, so the caller supplies it from the directory listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Placement {
    /// The only eligible archive in its directory.
    pub sole_in_directory: bool,
    /// Directly inside a download root rather than a series folder.
    pub in_download_root: bool,
}

/// Name parser compiled from a [`Vocabulary`].
///
/// Compilation happens once; every method afterwards is a pure function of
/// its arguments.
#[derive(Debug)]
pub struct Parser {
    vocabulary: Vocabulary,
    release_groups: Vec<String>,
    chapter: Vec<Strategy>,
    volume: Vec<Strategy>,
    volume_multi: Regex,
    chapter_multi: Regex,
    volume_cut: Regex,
    chapter_cut: Regex,
    exceptions: Option<Regex>,
}

fn alternation(list: &[String], field: &str) -> Result<String> {
    let keywords: Vec<&str> = list.iter().map(|k| k.trim()).filter(|k| !k.is_empty()).collect();
    if keywords.is_empty() {
        exn::bail!(ErrorKind::InvalidVocabulary(format!("{field} must not be empty")));
    }
    Ok(keywords.join("|"))
}

fn compile(template: &str, keywords: &str) -> Result<Regex> {
    let pattern = template.replace(consts::KEYWORDS, keywords);
    Regex::new(&pattern).or_raise(|| ErrorKind::InvalidVocabulary(pattern.clone()))
}

const CHAPTER_MULTI: &str = r"(?i)\b(?:KEYWORDS)\.?\s*\d+(?:\.\d+)?(?:\s*-\s*(?:(?:KEYWORDS)\.?\s*)?\d+(?:\.\d+)?)+\b";
/// Volume ranges join their numbers with a bare hyphen (`v01-03`); a spaced
/// ` - 005` after a volume is a chapter number, not the end of a range.
const VOLUME_MULTI: &str = r"(?i)\b(?:KEYWORDS)\.?\s*\d+(?:\.\d+)?(?:-(?:(?:KEYWORDS)\.?\s*)?\d+(?:\.\d+)?)+\b";
const VOLUME_CUT: &str = r"(?i)(?:\s*-\s*)?[\[({]?\b(?:(?:KEYWORDS)\.?|Part)[-_. ]?\s*\d+\b";
const CHAPTER_CUT: &str = r"(?i)(?:\s*-\s*)?[\[({]?\b(?:KEYWORDS)\.?[-_. ]?\s*\d+\b.*$";

impl Parser {
    pub fn new(vocabulary: Vocabulary) -> Result<Self> {
        let volume = alternation(&vocabulary.volume_keywords, "volume_keywords")?;
        let chapter = alternation(&vocabulary.chapter_keywords, "chapter_keywords")?;
        let exceptions = match alternation(&vocabulary.exception_keywords, "exception_keywords") {
            Ok(keywords) => Some(compile(r"(?i)\b(?:KEYWORDS)\b", &keywords)?),
            Err(_) => None,
        };
        Ok(Self {
            release_groups: vocabulary.release_groups.iter().map(|g| g.trim().to_lowercase()).filter(|g| !g.is_empty()).collect(),
            chapter: strategy::chapter_strategies(&chapter)?,
            volume: strategy::volume_strategies(&volume)?,
            volume_multi: compile(VOLUME_MULTI, &volume)?,
            chapter_multi: compile(CHAPTER_MULTI, &chapter)?,
            volume_cut: compile(VOLUME_CUT, &volume)?,
            chapter_cut: compile(CHAPTER_CUT, &chapter)?,
            exceptions,
            vocabulary,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn has_volume_keyword(&self, name: &str) -> bool {
        strategy::first_match(&self.volume, &name::prepare(name)).is_some()
    }

    /// Whether any chapter matcher isolates a number in the name.
    pub fn has_chapter_number(&self, name: &str) -> bool {
        let prepared = name::prepare(name);
        strategy::first_match(&self.chapter, &consts::EPISODE.replace_all(&prepared, "")).is_some()
    }

    pub fn has_exception_keyword(&self, name: &str) -> bool {
        self.exceptions.as_ref().is_some_and(|re| re.is_match(name))
    }

    /// A file is a chapter when a chapter matcher finds a number and no
    /// volume keyword is present.
    pub fn classify(&self, name: &str) -> FileType {
        if self.has_chapter_number(name) && !self.has_volume_keyword(name) {
            FileType::Chapter
        } else {
            FileType::Volume
        }
    }

    pub fn is_one_shot(&self, name: &str, placement: Placement) -> bool {
        (placement.sole_in_directory || placement.in_download_root)
            && !self.has_volume_keyword(name)
            && !self.has_chapter_number(name)
            && !self.has_exception_keyword(name)
    }

    /// Classifies the file at `path`, ready to be described.
    pub fn release_file(&self, path: impl AsRef<Path>) -> Result<ReleaseFile> {
        let path = path.as_ref();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        ReleaseFile::new(path, self.classify(name))
    }

    /// Builds the full descriptor of one archive.
    ///
    /// A descriptor without a number is still returned; deciding whether to
    /// drop it is up to the caller. An empty series name is an error.
    #[instrument(level = "debug", skip(self, file), fields(file = %file.name))]
    pub fn describe(&self, file: ReleaseFile, placement: Placement) -> Result<ReleaseDescriptor> {
        let name = file.name.as_str();
        let is_one_shot = file.file_type == FileType::Volume && self.is_one_shot(name, placement);
        let number = if is_one_shot {
            Some(ReleaseNumber::Single(Number::Integer(1)))
        } else {
            self.number(name, file.file_type)?
        };
        let series_name = self.series_name(name, file.file_type, number.as_ref());
        if series_name.is_empty() {
            exn::bail!(ErrorKind::MissingField("series_name"));
        }
        let descriptor = ReleaseDescriptor {
            part: self.part(name, file.file_type),
            year: self.year(name),
            release_group: self.release_group(name),
            extras: self.extras(name, &series_name, file.file_type, file.extension),
            series_name,
            number,
            is_one_shot,
            file,
        };
        tracing::debug!(series = %descriptor.series_name, label = %descriptor.label(), "Described release");
        Ok(descriptor)
    }

    /// Classifies and describes the archive at `path` in one step.
    pub fn describe_path(&self, path: impl AsRef<Path>, placement: Placement) -> Result<ReleaseDescriptor> {
        self.describe(self.release_file(path)?, placement)
    }
}
