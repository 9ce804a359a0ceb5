//! Moves downloaded releases into their series folders, replacing or
//! discarding whatever already holds the same slot.

use std::path::Path;

use tankobon_extract::models::ReleaseDescriptor;
use tracing::instrument;

use crate::context::{Context, RunContext};
use crate::matcher::{self, MatchOutcome, Profile};
use crate::notify::{Event, ManualReason};
use crate::organize::{Action, execute};
use crate::scan;
use crate::upgrade::{Resolution, resolve, same_slot};

#[instrument(skip_all)]
pub fn check_existing(ctx: &Context, run: &mut RunContext) {
    for (directory, is_root) in scan::download_directories(ctx, run) {
        let descriptors = scan::describe_directory(ctx, run, &directory, is_root);
        if descriptors.is_empty() {
            continue;
        }
        let batch = Profile::of(&descriptors);
        tracing::debug!(directory = %directory.path.display(), releases = descriptors.len(), "Checking downloads");
        for descriptor in &descriptors {
            check_release(ctx, run, descriptor, &batch);
        }
    }
}

fn check_release(ctx: &Context, run: &mut RunContext, descriptor: &ReleaseDescriptor, batch: &Profile) {
    if run.is_gone(&descriptor.file.path) {
        return;
    }
    if run.is_skipped(descriptor) {
        tracing::debug!(file = %descriptor.file.name, "Series already unmatched this run");
        return;
    }
    match matcher::find_folder(ctx, run, descriptor, batch) {
        MatchOutcome::Matched { folder, source } => {
            tracing::debug!(file = %descriptor.file.name, folder = %folder.display(), ?source, "Matched");
            place(ctx, run, descriptor, &folder);
        },
        MatchOutcome::Ambiguous(candidates) => {
            run.report.error(format!(
                "{} matches {} library folders; left in place",
                descriptor.file.name,
                candidates.len()
            ));
            ctx.notifier.notify(&Event::ManualDecision {
                name: descriptor.file.name.clone(),
                candidates,
                reason: ManualReason::AmbiguousMatch,
            });
        },
        MatchOutcome::Unmatched => {
            run.skip(descriptor);
            ctx.notifier.notify(&Event::Unmatched {
                name: descriptor.file.name.clone(),
                series: descriptor.series_name.clone(),
            });
        },
    }
}

fn same_content(ctx: &Context, a: &Path, b: &Path) -> bool {
    match (ctx.backend.hash(a), ctx.backend.hash(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn folder_name(folder: &Path) -> &str {
    folder.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

/// Settles `downloaded` against the contents of `folder`.
pub(crate) fn place(ctx: &Context, run: &mut RunContext, downloaded: &ReleaseDescriptor, folder: &Path) {
    let existing = scan::describe_folder(ctx, run, folder);
    let in_slot: Vec<&ReleaseDescriptor> = existing
        .iter()
        .filter(|release| release.file.path != downloaded.file.path && same_slot(downloaded, release))
        .collect();

    if let Some(identical) = in_slot.iter().find(|release| same_content(ctx, &downloaded.file.path, &release.file.path)) {
        if execute(ctx, run, &[Action::Delete(downloaded.file.path.clone())]) {
            ctx.notifier.notify(&Event::DuplicateDeleted {
                name: downloaded.file.name.clone(),
                kept: identical.file.path.clone(),
            });
        }
        return;
    }

    let series = folder_name(folder);
    let target = match ctx.template.file_name(downloaded, Some(series)) {
        Ok(name) => folder.join(name),
        Err(e) => {
            run.report.error(format!("Could not name {}: {e}", downloaded.file.name));
            return;
        },
    };
    let moved = Action::Move {
        from: downloaded.file.path.clone(),
        to: target.clone(),
    };

    match resolve(&ctx.scorer, downloaded, &in_slot) {
        Resolution::New => {
            if matches!(ctx.backend.exists(&target), Ok(true)) {
                run.report.error(format!("Cannot move {}: {} already exists", downloaded.file.name, target.display()));
                return;
            }
            if execute(ctx, run, &[moved]) {
                ctx.notifier.notify(&Event::NewRelease {
                    series: series.to_string(),
                    name: file_name(&target),
                    location: folder.to_path_buf(),
                });
            }
        },
        Resolution::KeepExisting { decision, kept } => {
            tracing::info!(
                file = %downloaded.file.name,
                downloaded_score = decision.downloaded_score,
                existing_score = decision.existing_score,
                "Existing release is better"
            );
            if execute(ctx, run, &[Action::Delete(downloaded.file.path.clone())]) {
                ctx.notifier.notify(&Event::DuplicateDeleted {
                    name: downloaded.file.name.clone(),
                    kept,
                });
            }
        },
        Resolution::Upgrade { decision, replaced } => {
            let before: Vec<String> = replaced.iter().map(|path| file_name(path)).collect();
            let mut actions: Vec<Action> = replaced.into_iter().map(Action::Delete).collect();
            actions.push(moved);
            if execute(ctx, run, &actions) {
                ctx.notifier.notify(&Event::Upgrade {
                    series: series.to_string(),
                    before,
                    after: file_name(&target),
                    existing_score: decision.existing_score,
                    downloaded_score: decision.downloaded_score,
                    location: folder.to_path_buf(),
                });
            }
        },
        Resolution::Manual { reason } => {
            run.report.error(format!("{} needs a manual decision: {reason}", downloaded.file.name));
            ctx.notifier.notify(&Event::ManualDecision {
                name: downloaded.file.name.clone(),
                candidates: in_slot.iter().map(|release| release.file.path.clone()).collect(),
                reason,
            });
        },
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}
