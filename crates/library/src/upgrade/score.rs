use exn::ResultExt;
use regex::{Regex, RegexBuilder};
use tankobon_config::RankedKeyword;
use tankobon_extract::models::{FileType, ReleaseDescriptor};

use crate::error::{ErrorKind, Result};
use crate::upgrade::decision::{UpgradeDecision, decide};

#[derive(Debug, Clone)]
struct Keyword {
    regex: Regex,
    score: i32,
    file_type: Option<FileType>,
}

/// Compiled [`RankedKeyword`] table.
///
/// A release's score is the sum over every keyword whose pattern matches its
/// file name. Every keyword is tried; there is no first-match exit.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    keywords: Vec<Keyword>,
}

impl Scorer {
    pub fn new(keywords: &[RankedKeyword]) -> Result<Self> {
        let keywords = keywords
            .iter()
            .map(|keyword| {
                let regex = RegexBuilder::new(&keyword.pattern)
                    .case_insensitive(true)
                    .build()
                    .or_raise(|| ErrorKind::InvalidKeyword(keyword.pattern.clone()))?;
                Ok(Keyword {
                    regex,
                    score: keyword.score,
                    file_type: keyword.file_type,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { keywords })
    }

    pub fn score(&self, descriptor: &ReleaseDescriptor) -> i32 {
        let file_type = descriptor.file_type();
        self.keywords
            .iter()
            .filter(|keyword| keyword.file_type.is_none_or(|scoped| scoped == file_type))
            .filter(|keyword| keyword.regex.is_match(&descriptor.file.name))
            .fold(0, |total: i32, keyword| total.saturating_add(keyword.score))
    }

    pub fn compare(&self, downloaded: &ReleaseDescriptor, existing: &ReleaseDescriptor) -> UpgradeDecision {
        let decision = decide(self.score(downloaded), self.score(existing));
        tracing::debug!(
            downloaded = %downloaded.file.name,
            existing = %existing.file.name,
            downloaded_score = decision.downloaded_score,
            existing_score = decision.existing_score,
            outcome = ?decision.outcome,
            "Compared releases"
        );
        decision
    }
}
