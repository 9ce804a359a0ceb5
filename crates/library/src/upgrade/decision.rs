#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    KeepExisting,
    KeepDownloaded,
    /// Equal scores are never settled automatically.
    ManualTie,
}

/// The result of ranking two releases for the same slot. Pure data; acting
/// on it is the executor's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeDecision {
    pub outcome: Outcome,
    pub downloaded_score: i32,
    pub existing_score: i32,
}

impl UpgradeDecision {
    pub fn is_upgrade(&self) -> bool {
        self.outcome == Outcome::KeepDownloaded
    }
}

pub fn decide(downloaded_score: i32, existing_score: i32) -> UpgradeDecision {
    let outcome = match downloaded_score.cmp(&existing_score) {
        std::cmp::Ordering::Greater => Outcome::KeepDownloaded,
        std::cmp::Ordering::Less => Outcome::KeepExisting,
        std::cmp::Ordering::Equal => Outcome::ManualTie,
    };
    UpgradeDecision {
        outcome,
        downloaded_score,
        existing_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 0, Outcome::KeepDownloaded)]
    #[case(-5, 0, Outcome::KeepExisting)]
    #[case(-3, -3, Outcome::ManualTie)]
    #[case(0, 0, Outcome::ManualTie)]
    fn test_decide(#[case] downloaded: i32, #[case] existing: i32, #[case] expected: Outcome) {
        let decision = decide(downloaded, existing);
        assert_eq!(decision.outcome, expected);
        assert_eq!(decision.is_upgrade(), downloaded > existing);
    }
}
