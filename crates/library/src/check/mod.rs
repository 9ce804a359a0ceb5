//! The passes a run is made of, in the order they execute.
//!
//! Each pass records per-file problems in the run's report and carries on.
//! A pass whose paths are not configured is skipped with a single error.

mod covers;
mod duplicates;
mod existing;
mod missing;
mod rename;

use tankobon_config::Features;
use tracing::instrument;

pub use self::covers::extract_covers;
pub use self::duplicates::check_duplicates;
pub use self::existing::check_existing;
pub use self::missing::{check_missing, missing_numbers};
pub use self::rename::rename_downloads;
use crate::context::{Context, RunContext};

/// Runs every enabled pass, then flushes the path cache.
#[instrument(skip_all, fields(?features))]
pub fn run(ctx: &Context, run: &mut RunContext, features: Features) {
    let has_downloads = !ctx.download_paths.is_empty();
    let has_library = !ctx.library_paths.is_empty();

    if features.rename_downloads {
        match has_downloads {
            true => rename_downloads(ctx, run),
            false => run.report.error("Skipping download renaming: no download paths configured"),
        }
    }
    if features.check_existing {
        match (has_downloads, has_library) {
            (true, true) => check_existing(ctx, run),
            (false, _) => run.report.error("Skipping existing-series check: no download paths configured"),
            (_, false) => run.report.error("Skipping existing-series check: no library paths configured"),
        }
    }
    let library_passes: [(bool, &str, fn(&Context, &mut RunContext)); 3] = [
        (features.check_duplicates, "duplicate check", check_duplicates),
        (features.check_missing, "missing-volume check", check_missing),
        (features.extract_covers, "cover extraction", extract_covers),
    ];
    for (enabled, name, pass) in library_passes {
        if !enabled {
            continue;
        }
        match has_library {
            true => pass(ctx, run),
            false => run.report.error(format!("Skipping {name}: no library paths configured")),
        }
    }

    if let Err(e) = run.cache.flush(ctx.backend.as_ref()) {
        run.report.error(format!("Could not save the path cache: {e}"));
    }
}
