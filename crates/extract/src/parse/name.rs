//! Series-name recovery and the text clean-up shared by every parse step.

use crate::consts;
use crate::models::{FileType, ReleaseNumber};
use crate::parse::{Parser, strategy};

/// Normalises a raw file name before any pattern runs: drops the extension
/// and rewrites underscores. An underscore between two digits becomes a
/// decimal point (`file_5_2` reads as `5.2`); every other one is a space.
pub(crate) fn prepare(name: &str) -> String {
    let name = consts::EXTENSION.replace(name.trim(), "");
    let chars: Vec<char> = name.chars().collect();
    let rewritten: String = chars
        .iter()
        .enumerate()
        .map(|(i, &c)| match c {
            '_' if i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(char::is_ascii_digit) =>
            {
                '.'
            },
            '_' => ' ',
            c => c,
        })
        .collect();
    consts::WHITESPACE.replace_all(rewritten.trim(), " ").into_owned()
}

/// Drops every bracketed group, unless the whole string is one group (a
/// series literally named `[Oshi no Ko]` keeps its brackets).
pub fn remove_brackets(s: &str) -> String {
    let trimmed = s.trim();
    if let Some(m) = consts::BRACKET_GROUP.find(trimmed)
        && m.start() == 0
        && m.end() == trimmed.len()
    {
        return trimmed.to_string();
    }
    consts::BRACKET_GROUP.replace_all(trimmed, " ").into_owned()
}

/// Collapses whitespace and trims separators left dangling by truncation.
pub(crate) fn tidy(s: &str) -> String {
    let collapsed = consts::WHITESPACE.replace_all(s, " ");
    let collapsed = consts::SPACE_BEFORE_PUNCTUATION.replace_all(&collapsed, "$1");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '_' | ',' | ':'))
        .to_string()
}

/// A series name made of nothing but digits is a numbering leftover.
fn reject_numeric(name: String) -> String {
    if consts::ONLY_NUMBERS.is_match(&name) { String::new() } else { name }
}

impl Parser {
    /// Recovers the series name from a file name. Returns an empty string
    /// when nothing usable remains.
    pub fn series_name(&self, name: &str, file_type: FileType, number: Option<&ReleaseNumber>) -> String {
        let prepared = prepare(name);
        let series = match file_type {
            FileType::Volume => self.volume_series_name(&prepared),
            FileType::Chapter => self.chapter_series_name(&prepared, number),
        };
        reject_numeric(series)
    }

    fn volume_series_name(&self, prepared: &str) -> String {
        let head = match self.volume_cut.find(prepared) {
            Some(m) => &prepared[..m.start()],
            // No numbering at all: treat the whole name as the title.
            None => prepared,
        };
        tidy(&remove_brackets(head))
    }

    fn chapter_series_name(&self, prepared: &str, number: Option<&ReleaseNumber>) -> String {
        let text = consts::EPISODE.replace_all(prepared, "");
        let head = match strategy::first_match(&self.chapter, &text) {
            Some(m) => &text[..m.start],
            None => &text[..],
        };
        let mut series = tidy(&remove_brackets(head));
        series = consts::TRAILING_LONE_BRACKET.replace(&series, "").into_owned();
        if let Some(m) = self.chapter_cut.find(&series) {
            series.truncate(m.start());
        }
        series = consts::LEADING_NUMBER_DASH.replace(&series, "").into_owned();
        series = consts::TRAILING_DASH.replace(&series, "").into_owned();
        if let Some(number) = number {
            series = strip_trailing_number(&series, number);
        }
        series = consts::TRAILING_SEASON.replace(&series, "").into_owned();
        tidy(&series)
    }
}

/// Removes a trailing `001`/`#1` token equal to the parsed chapter number.
fn strip_trailing_number(series: &str, number: &ReleaseNumber) -> String {
    let trimmed = series.trim_end();
    let Some((head, last)) = trimmed.rsplit_once(' ') else {
        return trimmed.to_string();
    };
    match last.trim_start_matches('#').parse() {
        Ok(value) if number.first() == value => head.to_string(),
        _ => trimmed.to_string(),
    }
}
