//! Volume and chapter number extraction.

use std::str::FromStr;

use crate::consts;
use crate::error::Result;
use crate::models::{FileType, MultiKind, MultiNumber, Number, ReleaseNumber};
use crate::parse::name::{prepare, remove_brackets};
use crate::parse::{Parser, strategy};

/// Builds the release number from every number found in one token.
///
/// Volumes always collapse to a range. Chapters only do when exactly two
/// numbers are given; longer runs (`3.5-3.6-3.7`) are kept as a list.
fn release_number(numbers: Vec<Number>, file_type: FileType) -> Option<ReleaseNumber> {
    let first = *numbers.first()?;
    let kind = match (file_type, numbers.len()) {
        (FileType::Volume, _) | (FileType::Chapter, ..=2) => MultiKind::Range,
        (FileType::Chapter, _) => MultiKind::Discrete,
    };
    Some(MultiNumber::new(numbers, kind).map_or(ReleaseNumber::Single(first), ReleaseNumber::Multi))
}

/// Splits a hyphen-joined token (`001 - 003`) into its numbers.
fn split_token(token: &str) -> Result<Vec<Number>> {
    token.split('-').map(str::trim).filter(|s| !s.is_empty()).map(Number::from_str).collect()
}

impl Parser {
    /// Extracts the number of a release.
    ///
    /// Returns `Ok(None)` when the name carries no number, and an error when
    /// a numeric token was isolated but cannot be read as a number.
    pub fn number(&self, name: &str, file_type: FileType) -> Result<Option<ReleaseNumber>> {
        let prepared = prepare(name);
        if consts::ONLY_NUMBERS.is_match(&prepared) {
            return Ok(None);
        }
        let (text, multi, strategies) = match file_type {
            FileType::Volume => (prepared, &self.volume_multi, &self.volume),
            FileType::Chapter => (consts::EPISODE.replace_all(&prepared, "").into_owned(), &self.chapter_multi, &self.chapter),
        };
        if let Some(m) = multi.find(&remove_brackets(&text)) {
            let numbers = consts::NUMBER_TOKEN
                .find_iter(m.as_str())
                .map(|n| Number::from_str(n.as_str()))
                .collect::<Result<Vec<_>>>()?;
            tracing::trace!(name, matched = m.as_str(), "Found multi-number release");
            return Ok(release_number(numbers, file_type));
        }
        match strategy::first_match(strategies, &text) {
            Some(m) => {
                tracing::trace!(name, strategy = m.strategy, number = m.number, "Found release number");
                Ok(release_number(split_token(m.number)?, file_type))
            },
            None => Ok(None),
        }
    }

    /// Extracts the part of a release: `Part 2` for volumes, the `x2`/`#2`
    /// suffix for chapters.
    pub fn part(&self, name: &str, file_type: FileType) -> Option<Number> {
        let prepared = prepare(name);
        let token = match file_type {
            FileType::Volume => consts::VOLUME_PART.captures(&prepared)?.get(1)?.as_str().to_string(),
            FileType::Chapter => {
                let text = consts::EPISODE.replace_all(&prepared, "");
                strategy::first_match(&self.chapter, &text)?.part?.to_string()
            },
        };
        token.parse().ok()
    }
}
