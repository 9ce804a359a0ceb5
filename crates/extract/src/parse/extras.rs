//! Bracketed metadata: extras, year, and release group.

use std::collections::HashSet;

use crate::consts;
use crate::models::{Extension, FileType};
use crate::parse::Parser;
use crate::parse::name::prepare;

/// Text inside a bracket group, e.g. `Digital` for `(Digital)`.
fn inner(group: &str) -> &str {
    group.get(1..group.len().saturating_sub(1)).unwrap_or_default().trim()
}

fn is_premium(extra: &str) -> bool {
    inner(extra).eq_ignore_ascii_case("premium")
}

impl Parser {
    /// Collects the edition and metadata tags of a release.
    ///
    /// Canonical tags found as bare words come first, followed by every
    /// bracketed group in order of appearance. Duplicates are dropped
    /// case-insensitively and a Premium tag is always sorted to the front.
    pub fn extras(&self, name: &str, series_name: &str, file_type: FileType, extension: Extension) -> Vec<String> {
        let prepared = prepare(name);
        let text = if series_name.is_empty() { prepared } else { prepared.replacen(series_name, " ", 1) };
        let series_lower = series_name.to_lowercase();

        let mut extras = Vec::new();
        for found in consts::CANONICAL_TAG.find_iter(&text) {
            let Some(tag) = consts::CANONICAL_TAGS.iter().find(|tag| tag.eq_ignore_ascii_case(found.as_str())) else {
                continue;
            };
            if !series_lower.contains(&tag.to_lowercase()) {
                extras.push(extension.bracket(tag));
            }
        }
        for group in consts::BRACKET_GROUP.find_iter(&text) {
            let content = inner(group.as_str());
            let excluded = content.is_empty()
                || consts::YEAR_ONLY.is_match(content)
                || consts::OMNIBUS_OR_PREMIUM.is_match(content)
                || (file_type == FileType::Volume && consts::PART_ONLY.is_match(content));
            if !excluded {
                extras.push(group.as_str().trim().to_string());
            }
        }

        let mut seen = HashSet::new();
        extras.retain(|extra| seen.insert(inner(extra).to_lowercase()));
        extras.sort_by_key(|extra| !is_premium(extra));
        extras
    }

    /// The first four-digit number inside any bracket type.
    pub fn year(&self, name: &str) -> Option<u16> {
        consts::BRACKETED_YEAR.captures(name)?.get(1)?.as_str().parse().ok()
    }

    /// The first bracketed group naming one of the configured release
    /// groups, without its brackets.
    pub fn release_group(&self, name: &str) -> Option<String> {
        if self.release_groups.is_empty() {
            return None;
        }
        consts::BRACKET_GROUP.find_iter(name).find_map(|group| {
            let content = inner(group.as_str());
            let lower = content.to_lowercase();
            self.release_groups.iter().any(|g| lower.contains(g.as_str())).then(|| content.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Vocabulary;
    use rstest::rstest;

    fn parser() -> Parser {
        let vocabulary = Vocabulary {
            release_groups: vec!["GroupA".to_string(), "1r0n".to_string()],
            ..Vocabulary::default()
        };
        Parser::new(vocabulary).unwrap()
    }

    #[rstest]
    #[case("Alpha v01 (2022) (Digital) (GroupA).cbz", "Alpha", &["(Digital)", "(GroupA)"])]
    #[case("Alpha v01 (Digital) (Premium).cbz", "Alpha", &["(Premium)", "(Digital)"])]
    #[case("Alpha v01 Premium (Digital).epub", "Alpha", &["[Premium]", "(Digital)"])]
    #[case("Alpha v01 (Part 2) [Digital].cbz", "Alpha", &["[Digital]"])]
    #[case("Alpha v01 (Omnibus Edition).cbz", "Alpha", &["(Omnibus)"])]
    #[case("Alpha v01 (Digital) (digital).cbz", "Alpha", &["(Digital)"])]
    #[case("Complete Works v01.cbz", "Complete Works", &[])]
    fn test_volume_extras(#[case] name: &str, #[case] series: &str, #[case] expected: &[&str]) {
        let extension = Extension::from_path(name).unwrap();
        assert_eq!(parser().extras(name, series, FileType::Volume, extension), expected);
    }

    #[test]
    fn test_chapter_keeps_part_groups() {
        let extras = parser().extras("Beta c005 (Part 2).cbz", "Beta", FileType::Chapter, Extension::Cbz);
        assert_eq!(extras, vec!["(Part 2)"]);
    }

    #[rstest]
    #[case("Alpha v01 (2022).cbz", Some(2022))]
    #[case("Alpha v01 [ 2019 ].cbz", Some(2019))]
    #[case("Alpha v01 {2018} (2022).cbz", Some(2018))]
    #[case("Alpha 2022 v01.cbz", None)]
    fn test_year(#[case] name: &str, #[case] expected: Option<u16>) {
        assert_eq!(parser().year(name), expected);
    }

    #[rstest]
    #[case("Alpha v01 (Digital) (GroupA).cbz", Some("GroupA"))]
    #[case("Alpha v01 (Digital-1r0n).cbz", Some("Digital-1r0n"))]
    #[case("Alpha v01 (groupa).cbz", Some("groupa"))]
    #[case("Alpha v01 (Digital).cbz", None)]
    #[case("GroupA v01.cbz", None)]
    fn test_release_group(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(parser().release_group(name).as_deref(), expected);
    }
}
