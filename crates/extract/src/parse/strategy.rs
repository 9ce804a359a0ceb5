//! Named matchers isolating a number inside a release name.
//!
//! Each [`Strategy`] is a pure function of the name. Strategies are tried in
//! their declared order and the first accepted match wins.

use regex::Regex;

use crate::consts;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;

/// A number located inside a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberMatch<'a> {
    pub strategy: &'static str,
    /// Start of the whole match; everything before it is series context.
    pub start: usize,
    pub number: &'a str,
    pub part: Option<&'a str>,
}

#[derive(Debug)]
pub struct Strategy {
    name: &'static str,
    regex: Regex,
    /// Reject matches preceded by words such as `Part` or `Season`.
    guarded: bool,
}
impl Strategy {
    /// Compiles `pattern`, substituting the keyword alternation. The
    /// pattern must define a `number` capture group.
    pub(crate) fn new(name: &'static str, pattern: &str, keywords: &str, guarded: bool) -> Result<Self> {
        let pattern = pattern.replace(consts::KEYWORDS, keywords);
        let regex = Regex::new(&pattern).or_raise(|| ErrorKind::InvalidVocabulary(format!("{name}: {pattern}")))?;
        Ok(Self { name, regex, guarded })
    }

    pub fn find<'a>(&self, haystack: &'a str) -> Option<NumberMatch<'a>> {
        self.regex.captures_iter(haystack).find_map(|captures| {
            let whole = captures.get(0)?;
            if self.guarded && consts::EXCLUDED_BEFORE_NUMBER.is_match(&haystack[..whole.start()]) {
                tracing::trace!(strategy = self.name, matched = whole.as_str(), "Rejected number after excluded word");
                return None;
            }
            Some(NumberMatch {
                strategy: self.name,
                start: whole.start(),
                number: captures.name("number")?.as_str(),
                part: captures.name("part").map(|m| m.as_str()),
            })
        })
    }
}

/// Runs each strategy in order, returning the first accepted match.
pub(crate) fn first_match<'a>(strategies: &[Strategy], haystack: &'a str) -> Option<NumberMatch<'a>> {
    strategies.iter().find_map(|strategy| strategy.find(haystack))
}

/// The chapter matchers, in priority order.
pub(crate) fn chapter_strategies(keywords: &str) -> Result<Vec<Strategy>> {
    let number = consts::NUMBER;
    let part = consts::PART_SUFFIX;
    Ok(vec![
        // "Series - 005 (2022)"
        Strategy::new(
            "dash",
            &format!(r"(?i)\s-\s*#?(?P<number>{number}){part}\s*(?:[(\[{{]|$)"),
            keywords,
            true,
        )?,
        // "Series c005", "Series Ch. 12.5"
        Strategy::new(
            "keyword",
            &format!(r"(?i)\b(?:{})\.?\s*#?(?P<number>{number}){part}", consts::KEYWORDS),
            keywords,
            false,
        )?,
        // "Series 005 (2022)", "Series #5"
        Strategy::new("lone", &format!(r"(?i)(?:\s#?|#)(?P<number>{number}){part}\s*(?:[(\[{{]|$)"), keywords, true)?,
        // "005 (2022)"
        Strategy::new("leading", &format!(r"(?i)^#?(?P<number>{number}){part}\s*(?:[(\[{{]|$)"), keywords, false)?,
    ])
}

/// The single volume matcher.
pub(crate) fn volume_strategies(keywords: &str) -> Result<Vec<Strategy>> {
    Ok(vec![Strategy::new(
        "keyword",
        &format!(r"(?i)\b(?:{})\.?\s*(?P<number>\d+(?:\.\d+)?)\b", consts::KEYWORDS),
        keywords,
        false,
    )?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const CHAPTER_KEYWORDS: &str = "Chapters?|Chaps?|Chs?|Cs?";

    fn chapter(name: &str) -> Option<(&'static str, String, Option<String>)> {
        let strategies = chapter_strategies(CHAPTER_KEYWORDS).unwrap();
        first_match(&strategies, name).map(|m| (m.strategy, m.number.to_string(), m.part.map(str::to_string)))
    }

    #[rstest]
    #[case("Series - 005 (2022)", "dash", "005")]
    #[case("Series c012.5 (2022)", "keyword", "012.5")]
    #[case("Series Ch. 7", "keyword", "7")]
    #[case("Series 005 (2022)", "lone", "005")]
    #[case("Series #5", "lone", "5")]
    #[case("005 (2022)", "leading", "005")]
    #[case("Series c001-003", "keyword", "001-003")]
    fn test_chapter_strategy_priority(#[case] name: &str, #[case] strategy: &str, #[case] number: &str) {
        let (found, value, _) = chapter(name).unwrap();
        assert_eq!(found, strategy);
        assert_eq!(value, number);
    }

    #[test]
    fn test_dash_beats_keyword() {
        // Both would match; the declared order decides.
        let (strategy, number, _) = chapter("Chapter Black - 010").unwrap();
        assert_eq!(strategy, "dash");
        assert_eq!(number, "010");
    }

    #[rstest]
    #[case("Series Part 2 (2020)")]
    #[case("Series Season 2")]
    #[case("Series Episode 3")]
    #[case("Alpha (2020)")]
    #[case("Alpha5")]
    fn test_chapter_rejections(#[case] name: &str) {
        assert_eq!(chapter(name), None);
    }

    #[test]
    fn test_part_suffix() {
        let (_, number, part) = chapter("Series c005x2 (2022)").unwrap();
        assert_eq!(number, "005");
        assert_eq!(part.as_deref(), Some("2"));
    }

    #[rstest]
    #[case("Alpha v05 (2022)", Some("05"))]
    #[case("Alpha Vol. 3", Some("3"))]
    #[case("Alpha Volume 1.5", Some("1.5"))]
    #[case("Revolver 2", None)]
    #[case("Alpha (2020)", None)]
    fn test_volume_strategy(#[case] name: &str, #[case] expected: Option<&str>) {
        let strategies = volume_strategies("Volumes?|Vols?|V").unwrap();
        assert_eq!(first_match(&strategies, name).map(|m| m.number), expected);
    }

    #[test]
    fn test_invalid_keyword_fragment() {
        let err = chapter_strategies("Ch(").unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidVocabulary(_)));
    }
}
