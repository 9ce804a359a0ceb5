//! Writes cover images next to library archives that lack one.

use std::collections::HashSet;
use std::path::Path;

use tankobon_archive::{Cover, ImageFormat, find_cover};
use tankobon_extract::models::{FileType, ReleaseDescriptor};
use tracing::instrument;

use crate::context::{Context, RunContext};
use crate::organize::{Action, execute};
use crate::scan;

/// Stem of the folder-level cover image.
const FOLDER_COVER: &str = "cover";

fn has_image(names: &HashSet<String>, stem: &str) -> bool {
    ImageFormat::ALL
        .iter()
        .any(|format| names.contains(&format!("{stem}.{}", format.extension()).to_lowercase()))
}

fn read_cover(ctx: &Context, run: &mut RunContext, release: &ReleaseDescriptor) -> Option<Cover> {
    let bytes = match ctx.backend.read(&release.file.path) {
        Ok(bytes) => bytes,
        Err(e) => {
            run.report.error(format!("Could not read {}: {e}", release.file.path.display()));
            return None;
        },
    };
    match find_cover(&bytes) {
        Ok(Some(cover)) => Some(cover),
        Ok(None) => {
            tracing::debug!(file = %release.file.name, "Archive has no images");
            None
        },
        Err(e) => {
            run.report.error(format!("Could not open {}: {e}", release.file.path.display()));
            None
        },
    }
}

/// Volumes first, then by number.
fn sort_key(release: &ReleaseDescriptor) -> (bool, f64) {
    let number = release.number.as_ref().map(|n| n.first().as_f64()).unwrap_or(f64::MAX);
    (release.file_type() != FileType::Volume, number)
}

#[instrument(skip_all)]
pub fn extract_covers(ctx: &Context, run: &mut RunContext) {
    for folder in scan::library_folders(ctx, run) {
        extract_folder(ctx, run, &folder);
    }
}

fn extract_folder(ctx: &Context, run: &mut RunContext, folder: &Path) {
    let directory = match ctx.backend.read_dir(folder) {
        Ok(directory) => directory,
        Err(e) => {
            run.report.error(format!("Could not read {}: {e}", folder.display()));
            return;
        },
    };
    let names: HashSet<String> = directory.files.iter().map(|file| file.name().to_lowercase()).collect();
    let mut releases = scan::describe_directory(ctx, run, &directory, false);
    releases.sort_by(|a, b| sort_key(a).partial_cmp(&sort_key(b)).unwrap_or(std::cmp::Ordering::Equal));

    let mut needs_folder_cover = !has_image(&names, FOLDER_COVER);
    for release in &releases {
        let stem = &release.file.extensionless_name;
        let needs_own = !has_image(&names, &stem.to_lowercase());
        if !needs_own && !needs_folder_cover {
            continue;
        }
        let Some(cover) = read_cover(ctx, run, release) else {
            continue;
        };
        let mut actions = Vec::new();
        if needs_own {
            actions.push(Action::Write {
                path: folder.join(format!("{stem}.{}", cover.format.extension())),
                data: cover.data.clone(),
            });
        }
        if needs_folder_cover {
            actions.push(Action::Write {
                path: folder.join(format!("{FOLDER_COVER}.{}", cover.format.extension())),
                data: cover.data,
            });
            needs_folder_cover = false;
        }
        execute(ctx, run, &actions);
    }
}
