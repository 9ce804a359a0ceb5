//! Renames downloaded releases to the naming template, in place.

use tankobon_extract::Placement;
use tankobon_extract::models::ReleaseFile;
use tracing::instrument;

use crate::context::{Context, RunContext};
use crate::organize::{Action, execute};
use crate::scan;

/// Later passes rescan the downloads, so they see the new names. A new name
/// that no longer parses is reported.
#[instrument(skip_all)]
pub fn rename_downloads(ctx: &Context, run: &mut RunContext) {
    for (directory, is_root) in scan::download_directories(ctx, run) {
        let descriptors = scan::describe_directory(ctx, run, &directory, is_root);
        let placement = Placement {
            sole_in_directory: descriptors.len() == 1,
            in_download_root: is_root,
        };
        for descriptor in descriptors {
            let name = match ctx.template.file_name(&descriptor, None) {
                Ok(name) => name,
                Err(e) => {
                    run.report.error(format!("Could not name {}: {e}", descriptor.file.name));
                    continue;
                },
            };
            if name == descriptor.file.name {
                continue;
            }
            let target = descriptor.file.root.join(&name);
            // A case-only rename targets the same file on case-insensitive filesystems.
            let case_only = name.eq_ignore_ascii_case(&descriptor.file.name);
            if !case_only && matches!(ctx.backend.exists(&target), Ok(true)) {
                run.report.error(format!("Skipping rename of {}: {name} already exists", descriptor.file.name));
                continue;
            }
            let action = Action::Move {
                from: descriptor.file.path.clone(),
                to: target.clone(),
            };
            if !execute(ctx, run, &[action]) {
                continue;
            }
            let reparsed = ReleaseFile::new(&target, descriptor.file_type())
                .is_ok_and(|file| ctx.parser.describe(file, placement).is_ok_and(|d| d.number == descriptor.number));
            if !reparsed {
                run.report.error(format!("Renamed {name} no longer parses to the same release"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;

    #[test]
    fn test_renames_to_template() {
        let harness = Harness::new([
            ("/downloads/Alpha/Alpha_Vol_05_(2022)_(Digital).cbz", "a"),
            ("/downloads/Alpha/Alpha v06 (2022).cbz", "b"),
        ]);
        let mut run = RunContext::default();
        rename_downloads(&harness.ctx, &mut run);

        assert_eq!(
            harness.files(),
            vec!["/downloads/Alpha/Alpha v05 (2022) (Digital).cbz", "/downloads/Alpha/Alpha v06 (2022).cbz"]
        );
        assert_eq!(run.report.changes().len(), 1);
        assert!(run.report.errors().is_empty(), "{:?}", run.report.errors());
    }

    #[test]
    fn test_collision_is_skipped() {
        let harness = Harness::new([
            ("/downloads/Alpha Vol 05.cbz", "a"),
            ("/downloads/Alpha v05.cbz", "b"),
        ]);
        let mut run = RunContext::default();
        rename_downloads(&harness.ctx, &mut run);

        assert!(run.report.changes().is_empty());
        assert_eq!(harness.files().len(), 2);
        assert_eq!(run.report.errors().len(), 1);
    }
}
