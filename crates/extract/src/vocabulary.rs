//! User-tunable keyword lists driving the name parser.

/// Keyword lists used to recognise numbering in release names.
///
/// Keyword entries are regex fragments (`Volumes?` matches both `Volume` and
/// `Volumes`); they are matched case-insensitively at word boundaries.
/// Release groups are literal names matched inside brackets.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Vocabulary {
    pub volume_keywords: Vec<String>,
    pub chapter_keywords: Vec<String>,
    /// Names that legitimately contain these words are never one-shots.
    pub exception_keywords: Vec<String>,
    pub release_groups: Vec<String>,
}
impl Default for Vocabulary {
    fn default() -> Self {
        fn owned(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }
        Self {
            // Order matters: longer alternatives have to come first.
            volume_keywords: owned(&[
                "LN",
                "Light Novels?",
                "Novels?",
                "Books?",
                "Volumes?",
                "Vols?",
                "Discs?",
                "Tomo",
                "Tome",
                "Von",
                "V",
                "第",
                "T",
            ]),
            chapter_keywords: owned(&["Chapters?", "Chaps?", "Chs?", "Cs?"]),
            exception_keywords: owned(&[
                "Extras?",
                "Specials?",
                "Omake",
                "Bonus",
                "Prologue",
                "Epilogue",
                "Side Stor(?:y|ies)",
            ]),
            release_groups: Vec::new(),
        }
    }
}
