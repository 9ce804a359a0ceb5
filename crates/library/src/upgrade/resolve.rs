use std::ops::RangeInclusive;
use std::path::PathBuf;

use tankobon_extract::models::{MultiKind, Number, ReleaseDescriptor, ReleaseNumber};

use crate::notify::ManualReason;
use crate::upgrade::Scorer;
use crate::upgrade::decision::{Outcome, UpgradeDecision};

/// Whether two releases compete for the same place in a series: same type,
/// same part, and at least one number in common.
pub fn same_slot(a: &ReleaseDescriptor, b: &ReleaseDescriptor) -> bool {
    a.file_type() == b.file_type()
        && a.part == b.part
        && match (&a.number, &b.number) {
            (Some(x), Some(y)) => x.overlaps(y),
            _ => false,
        }
}

/// Whether `outer` holds every number `inner` holds.
pub fn covers(outer: &ReleaseNumber, inner: &ReleaseNumber) -> bool {
    let held = match inner {
        ReleaseNumber::Single(n) => outer.contains(*n),
        ReleaseNumber::Multi(m) => m.values().iter().all(|n| outer.contains(*n)),
    };
    held && inner.integer_spans().iter().all(|span| covers_span(outer, span))
}

/// Whether `outer` holds every whole number of `span`, compared by endpoints
/// where `outer` is a range.
fn covers_span(outer: &ReleaseNumber, span: &RangeInclusive<u32>) -> bool {
    let (start, end) = (Number::from(*span.start()), Number::from(*span.end()));
    match outer {
        ReleaseNumber::Single(n) => start == end && *n == start,
        ReleaseNumber::Multi(m) if m.kind() == MultiKind::Range => m.first() <= start && end <= m.last(),
        ReleaseNumber::Multi(m) => {
            let needed = u64::from(span.end() - span.start()) + 1;
            needed <= m.values().len() as u64 && span.clone().all(|n| m.contains(n.into()))
        },
    }
}

fn covers_release(outer: &ReleaseDescriptor, inner: &ReleaseDescriptor) -> bool {
    match (&outer.number, &inner.number) {
        (Some(outer), Some(inner)) => covers(outer, inner),
        _ => false,
    }
}

/// What should happen to a downloaded release, given the releases already
/// occupying its slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The slot is free.
    New,
    /// An existing release wins; the download goes.
    KeepExisting { decision: UpgradeDecision, kept: PathBuf },
    /// The download wins and replaces every release in `replaced`.
    Upgrade { decision: UpgradeDecision, replaced: Vec<PathBuf> },
    /// Nothing may be touched.
    Manual { reason: ManualReason },
}

/// Decides the fate of `downloaded` against `existing`, the releases
/// sharing its slot. Pure: nothing is read or written.
///
/// A multi-volume download replaces every single volume it covers. A
/// release is only ever deleted in favour of one that holds all of its
/// numbers; anything else needs a human.
pub fn resolve(scorer: &Scorer, downloaded: &ReleaseDescriptor, existing: &[&ReleaseDescriptor]) -> Resolution {
    if existing.is_empty() {
        return Resolution::New;
    }
    let decisions: Vec<(&ReleaseDescriptor, UpgradeDecision)> =
        existing.iter().map(|release| (*release, scorer.compare(downloaded, release))).collect();

    if let Some((_, tie)) = decisions.iter().find(|(_, d)| d.outcome == Outcome::ManualTie) {
        return Resolution::Manual {
            reason: ManualReason::Tie(tie.downloaded_score),
        };
    }
    if let Some((winner, decision)) = decisions.iter().find(|(_, d)| d.outcome == Outcome::KeepExisting) {
        return match covers_release(winner, downloaded) {
            true => Resolution::KeepExisting {
                decision: *decision,
                kept: winner.file.path.clone(),
            },
            false => Resolution::Manual {
                reason: ManualReason::PartialOverlap,
            },
        };
    }
    if !decisions.iter().all(|(release, _)| covers_release(downloaded, release)) {
        return Resolution::Manual {
            reason: ManualReason::PartialOverlap,
        };
    }
    // Every existing release lost; report the closest contest.
    let decision = decisions
        .iter()
        .map(|(_, d)| *d)
        .max_by_key(|d| d.existing_score)
        .unwrap_or_else(|| decisions[0].1);
    Resolution::Upgrade {
        decision,
        replaced: decisions.iter().map(|(release, _)| release.file.path.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;
    use tankobon_config::RankedKeyword;
    use tankobon_extract::{Placement, describe};

    fn scorer() -> Scorer {
        Scorer::new(&[
            RankedKeyword {
                pattern: "Digital".to_string(),
                score: 1,
                file_type: None,
            },
            RankedKeyword {
                pattern: "Scan".to_string(),
                score: -5,
                file_type: None,
            },
        ])
        .unwrap()
    }

    fn descriptor(path: &str) -> ReleaseDescriptor {
        describe(Path::new(path), Placement::default()).unwrap()
    }

    #[rstest]
    #[case("/a/Alpha v01.cbz", "/b/Alpha v01 (Digital).cbz", true)]
    #[case("/a/Alpha v01.cbz", "/b/Alpha v02.cbz", false)]
    #[case("/a/Alpha v01-03.cbz", "/b/Alpha v02.cbz", true)]
    #[case("/a/Alpha v01.cbz", "/b/Alpha c001.cbz", false)]
    #[case("/a/Alpha v02 Part 1.cbz", "/b/Alpha v02 Part 2.cbz", false)]
    #[case::chapter_tail_is_not_a_range("/a/Alpha Vol. 3 - 05 (Digital).cbz", "/b/Alpha v04.cbz", false)]
    fn test_same_slot(#[case] a: &str, #[case] b: &str, #[case] expected: bool) {
        assert_eq!(same_slot(&descriptor(a), &descriptor(b)), expected);
    }

    #[test]
    fn test_free_slot() {
        let downloaded = descriptor("/downloads/Alpha v01.cbz");
        assert_eq!(resolve(&scorer(), &downloaded, &[]), Resolution::New);
    }

    #[test]
    fn test_upgrade() {
        let downloaded = descriptor("/downloads/Alpha v01 (Digital).cbz");
        let existing = descriptor("/library/Alpha/Alpha v01.cbz");
        let Resolution::Upgrade { decision, replaced } = resolve(&scorer(), &downloaded, &[&existing]) else {
            panic!("expected an upgrade");
        };
        assert_eq!((decision.downloaded_score, decision.existing_score), (1, 0));
        assert_eq!(replaced, vec![PathBuf::from("/library/Alpha/Alpha v01.cbz")]);
    }

    #[test]
    fn test_keep_existing() {
        let downloaded = descriptor("/downloads/Gamma v02 (Scan).cbz");
        let existing = descriptor("/library/Gamma/Gamma v02.cbz");
        let resolution = resolve(&scorer(), &downloaded, &[&existing]);
        assert!(matches!(resolution, Resolution::KeepExisting { ref kept, .. } if kept == &existing.file.path));
    }

    #[test]
    fn test_tie_is_manual() {
        let downloaded = descriptor("/downloads/Alpha v01 (2022).cbz");
        let existing = descriptor("/library/Alpha/Alpha v01.cbz");
        assert_eq!(
            resolve(&scorer(), &downloaded, &[&existing]),
            Resolution::Manual {
                reason: ManualReason::Tie(0)
            }
        );
    }

    #[test]
    fn test_multi_volume_replaces_every_single() {
        let downloaded = descriptor("/downloads/Alpha v01-03 (Digital).cbz");
        let singles = ["/library/Alpha/Alpha v01.cbz", "/library/Alpha/Alpha v02.cbz", "/library/Alpha/Alpha v03.cbz"]
            .map(descriptor);
        let existing: Vec<&ReleaseDescriptor> = singles.iter().collect();
        let Resolution::Upgrade { replaced, .. } = resolve(&scorer(), &downloaded, &existing) else {
            panic!("expected an upgrade");
        };
        assert_eq!(replaced.len(), 3);
    }

    #[test]
    fn test_single_never_replaces_omnibus() {
        let downloaded = descriptor("/downloads/Alpha v02 (Digital).cbz");
        let existing = descriptor("/library/Alpha/Alpha v01-03.cbz");
        assert_eq!(
            resolve(&scorer(), &downloaded, &[&existing]),
            Resolution::Manual {
                reason: ManualReason::PartialOverlap
            }
        );
    }

    #[test]
    fn test_covers() {
        let range = descriptor("/a/Alpha v01-03.cbz").number.unwrap();
        let single = descriptor("/a/Alpha v02.cbz").number.unwrap();
        assert!(covers(&range, &single));
        assert!(!covers(&single, &range));
        assert!(covers(&single, &single));

        // Compared by endpoints, never expanded.
        let huge = descriptor("/a/Alpha v1-999999999.cbz").number.unwrap();
        assert!(covers(&huge, &range));
        assert!(!covers(&range, &huge));
        assert!(!covers(&single, &huge));
    }
}
