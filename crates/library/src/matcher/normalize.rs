//! Reduces series names to a comparison-safe form.

use tankobon_config::Transliteration;
use tankobon_extract::remove_brackets;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Articles, honorific particles, edition and medium words that carry no
/// series identity.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "of", "to", "in", "on", "for", "with", "no", "wa", "ga", "wo", "ni", "de", "san", "chan",
    "kun", "sama", "edition", "complete", "collection", "deluxe", "omnibus", "premium", "manga", "comic", "novel",
    "light", "ln",
];

/// Share of ASCII letters above which a name is treated as English.
const ENGLISH_RATIO: f64 = 0.9;

#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: Vec<String>,
    transliteration: Transliteration,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&[], Transliteration::default())
    }
}

impl Normalizer {
    /// `extra` stopwords are added to the built-in list.
    pub fn new(extra: &[String], transliteration: Transliteration) -> Self {
        let stopwords = STOPWORDS
            .iter()
            .map(|w| w.to_string())
            .chain(extra.iter().map(|w| w.trim().to_lowercase()))
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            stopwords,
            transliteration,
        }
    }

    /// Lowercased, bracket-free, punctuation-free, stopword-free form of
    /// `name`, with single spaces between words.
    ///
    /// A name made up entirely of stopwords is kept rather than reduced to
    /// nothing.
    pub fn normalize(&self, name: &str) -> String {
        let name = remove_brackets(&name.replace(':', " "));
        let name = match self.should_transliterate(&name) {
            true => transliterate(&name),
            false => name,
        };
        let stripped: String = name
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();
        let words: Vec<&str> = stripped.split_whitespace().collect();
        let kept: Vec<&str> = words.iter().copied().filter(|w| !self.stopwords.iter().any(|s| s == w)).collect();
        match kept.is_empty() {
            true => words.join(" "),
            false => kept.join(" "),
        }
    }

    fn should_transliterate(&self, name: &str) -> bool {
        match self.transliteration {
            Transliteration::Always => true,
            Transliteration::Never => false,
            Transliteration::Auto => looks_english(name),
        }
    }
}

/// Whether at least [`ENGLISH_RATIO`] of the letters in `s` are ASCII.
pub fn looks_english(s: &str) -> bool {
    let (ascii, total) = s
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(ascii, total), c| (ascii + usize::from(c.is_ascii()), total + 1));
    total > 0 && ascii as f64 / total as f64 >= ENGLISH_RATIO
}

/// Decomposes accented letters and drops the combining marks.
fn transliterate(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("The Alpha", "alpha")]
    #[case("Alpha: Beta!", "alpha beta")]
    #[case("Alpha  (Digital) [GroupA]", "alpha")]
    #[case("Kaguya-sama wa Kokurasetai", "kaguyasama kokurasetai")]
    #[case("Pokémon Adventures", "pokemon adventures")]
    #[case("The", "the")]
    #[case("[Oshi no Ko]", "oshi ko")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Normalizer::default().normalize(input), expected);
    }

    #[test]
    fn test_non_english_keeps_marks() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.normalize("ダンジョン飯"), "ダンジョン飯");
        let never = Normalizer::new(&[], Transliteration::Never);
        assert_eq!(never.normalize("Pokémon"), "pokémon");
    }

    #[test]
    fn test_extra_stopwords() {
        let normalizer = Normalizer::new(&["Official".to_string()], Transliteration::Auto);
        assert_eq!(normalizer.normalize("Alpha Official"), "alpha");
    }

    #[rstest]
    #[case("Alpha", true)]
    #[case("Pokémon Adventures", true)]
    #[case("Pokémon", false)]
    #[case("ダンジョン飯", false)]
    #[case("123", false)]
    fn test_looks_english(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(looks_english(input), expected);
    }
}
