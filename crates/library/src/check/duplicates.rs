//! Resolves releases sharing a slot inside one library folder.

use tracing::instrument;

use crate::context::{Context, RunContext};
use crate::notify::Event;
use crate::organize::{Action, execute};
use crate::scan;
use crate::upgrade::{Resolution, resolve, same_slot};

#[instrument(skip_all)]
pub fn check_duplicates(ctx: &Context, run: &mut RunContext) {
    for folder in scan::library_folders(ctx, run) {
        let releases = scan::describe_folder(ctx, run, &folder);
        for (i, a) in releases.iter().enumerate() {
            for b in &releases[i + 1..] {
                if run.is_gone(&a.file.path) {
                    break;
                }
                if run.is_gone(&b.file.path) || !same_slot(a, b) {
                    continue;
                }
                let identical = matches!(
                    (ctx.backend.hash(&a.file.path), ctx.backend.hash(&b.file.path)),
                    (Ok(x), Ok(y)) if x == y
                );
                // `a` plays the download, `b` the release already in place.
                let (loser, winner) = match identical {
                    true => (b, a),
                    false => match resolve(&ctx.scorer, a, &[b]) {
                        Resolution::Upgrade { .. } => (b, a),
                        Resolution::KeepExisting { .. } => (a, b),
                        Resolution::Manual { reason } => {
                            run.report.error(format!(
                                "{} and {} need a manual decision: {reason}",
                                a.file.name, b.file.name
                            ));
                            ctx.notifier.notify(&Event::ManualDecision {
                                name: a.file.name.clone(),
                                candidates: vec![b.file.path.clone()],
                                reason,
                            });
                            continue;
                        },
                        Resolution::New => continue,
                    },
                };
                if execute(ctx, run, &[Action::Delete(loser.file.path.clone())]) {
                    ctx.notifier.notify(&Event::DuplicateDeleted {
                        name: loser.file.name.clone(),
                        kept: winner.file.path.clone(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ManualReason;
    use crate::test_support::Harness;

    #[test]
    fn test_lower_score_is_deleted() {
        let harness = Harness::new([
            ("/library/Alpha/Alpha v01 (Scan).cbz", "scan"),
            ("/library/Alpha/Alpha v01 (Digital).cbz", "digital"),
            ("/library/Alpha/Alpha v02.cbz", "two"),
        ]);
        let mut run = RunContext::default();
        check_duplicates(&harness.ctx, &mut run);

        assert_eq!(
            harness.files(),
            vec!["/library/Alpha/Alpha v01 (Digital).cbz", "/library/Alpha/Alpha v02.cbz"]
        );
    }

    #[test]
    fn test_identical_copies_keep_one() {
        let harness = Harness::new([
            ("/library/Alpha/Alpha v01.cbz", "same"),
            ("/library/Alpha/Alpha Vol 1.cbz", "same"),
        ]);
        let mut run = RunContext::default();
        check_duplicates(&harness.ctx, &mut run);

        assert_eq!(harness.files().len(), 1);
    }

    #[test]
    fn test_tie_is_reported() {
        let harness = Harness::new([("/library/Alpha/Alpha v01.cbz", "a"), ("/library/Alpha/Alpha v01 (2020).cbz", "b")]);
        let mut run = RunContext::default();
        check_duplicates(&harness.ctx, &mut run);

        assert_eq!(harness.files().len(), 2);
        assert!(matches!(
            harness.events().as_slice(),
            [Event::ManualDecision {
                reason: ManualReason::Tie(0),
                ..
            }]
        ));
    }
}
