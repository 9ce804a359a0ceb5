use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Number token shared by the chapter matchers: `5`, `012.5`, `001-003`.
pub(crate) const NUMBER: &str = r"\d+(?:\.\d+)?(?:\s*-\s*\d+(?:\.\d+)?)*";
/// Optional `x2` / `#2` part suffix following a chapter number.
pub(crate) const PART_SUFFIX: &str = r"(?:\s*(?:x|#)(?P<part>\d+))?";
/// Placeholder replaced by an alternation of keywords when compiling.
pub(crate) const KEYWORDS: &str = "KEYWORDS";

regex!(EXTENSION, r"\.[A-Za-z][A-Za-z0-9]{0,4}$");
regex!(BRACKET_GROUP, r"\[[^\]]*\]|\([^)]*\)|\{[^}]*\}");
regex!(BRACKETED_YEAR, r"[\(\[\{]\s*(\d{4})\s*[\)\]\}]");
regex!(NUMBER_TOKEN, r"\d+(?:\.\d+)?");
regex!(ONLY_NUMBERS, r"^[\d\s.#-]*$");
regex!(WHITESPACE, r"\s+");
regex!(SPACE_BEFORE_PUNCTUATION, r"\s+([!?.,])");
regex!(EPISODE, r"(?i)\s*-?\s*\bEpisode\s*\d+(?:\.\d+)?");
regex!(VOLUME_PART, r"(?i)\bPart\s*[-_.]?\s*(\d+(?:\.\d+)?)\b");
regex!(PART_ONLY, r"(?i)^part\s*\d+(?:\.\d+)?$");
regex!(YEAR_ONLY, r"^\d{4}$");
regex!(OMNIBUS_OR_PREMIUM, r"(?i)^(?:omnibus|premium)(?:\s+edition)?$");
regex!(LEADING_NUMBER_DASH, r"^\d+\s*-\s*");
regex!(TRAILING_DASH, r"\s*-+$");
regex!(TRAILING_SEASON, r"(?i)\s+(?:S|Season)\s*\d+$");
regex!(TRAILING_LONE_BRACKET, r"\s[\(\[\{\)\]\}]$");
// Words that, directly before a bare number, mean it isn't a chapter number.
regex!(
    EXCLUDED_BEFORE_NUMBER,
    r"(?i)(?:\b(?:part|episode|season|arc|prologue|epilogue|omake|extra|special|side\s+story|s|act|ep|ver|version|pt|no|bonus|zom)\.?|[,×:꞉]|\d\.)\s*$"
);

/// Tags recognised as bare words anywhere in a name and re-emitted as
/// bracketed extras.
pub(crate) const CANONICAL_TAGS: [&str; 6] = ["Premium", "Omnibus", "Complete", "Fanbook", "Short Stories", "Short Story"];
regex!(CANONICAL_TAG, r"(?i)\b(?:Premium|Omnibus|Complete|Fanbook|Short Stories|Short Story)\b");
