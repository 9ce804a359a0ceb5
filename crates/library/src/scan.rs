//! Directory listings to descriptors.

use std::path::{Path, PathBuf};

use tankobon_extract::Placement;
use tankobon_extract::models::{Extension, ReleaseDescriptor};
use tankobon_storage::Directory;

use crate::context::{Context, RunContext};

/// Archives the library manages, skipping files already gone this run.
fn eligible<'a>(run: &RunContext, directory: &'a Directory) -> Vec<&'a Path> {
    directory
        .files
        .iter()
        .map(|file| file.path.as_path())
        .filter(|path| Extension::from_path(path).is_some() && !run.is_gone(path))
        .collect()
}

/// Describes every eligible archive in `directory`.
///
/// Files whose names do not parse are recorded in the report and left out;
/// a missing number only excludes the file when it is not a one-shot.
pub(crate) fn describe_directory(
    ctx: &Context,
    run: &mut RunContext,
    directory: &Directory,
    in_download_root: bool,
) -> Vec<ReleaseDescriptor> {
    let paths = eligible(run, directory);
    let placement = Placement {
        sole_in_directory: paths.len() == 1,
        in_download_root,
    };
    let mut descriptors = Vec::with_capacity(paths.len());
    for path in paths {
        match ctx.parser.describe_path(path, placement) {
            Ok(descriptor) if descriptor.number.is_none() => {
                run.report.error(format!("No volume or chapter number found: {}", path.display()));
            },
            Ok(descriptor) => descriptors.push(descriptor),
            Err(e) => run.report.error(format!("Could not parse {}: {e}", path.display())),
        }
    }
    descriptors
}

/// Reads and describes a single folder. A folder that cannot be listed is
/// reported and treated as empty.
pub(crate) fn describe_folder(ctx: &Context, run: &mut RunContext, folder: &Path) -> Vec<ReleaseDescriptor> {
    match ctx.backend.read_dir(folder) {
        Ok(directory) => describe_directory(ctx, run, &directory, false),
        Err(e) => {
            run.report.error(format!("Could not read {}: {e}", folder.display()));
            Vec::new()
        },
    }
}

/// Every folder below the library roots (roots themselves excluded), walked
/// once per run. Folders inside a download path are ignored.
pub(crate) fn library_folders(ctx: &Context, run: &mut RunContext) -> Vec<PathBuf> {
    if let Some(folders) = run.library_folders() {
        return folders.to_vec();
    }
    let mut folders = Vec::new();
    for root in &ctx.library_paths {
        match ctx.backend.walk(root) {
            Ok(directories) => folders.extend(
                directories
                    .into_iter()
                    .map(|directory| directory.path)
                    .filter(|path| path != root && !ctx.is_download_path(path)),
            ),
            Err(e) => run.report.error(format!("Could not walk library {}: {e}", root.display())),
        }
    }
    tracing::debug!(folders = folders.len(), "Walked library");
    run.set_library_folders(folders.clone());
    folders
}

/// Every directory below the download roots, paired with whether it is a
/// root itself.
pub(crate) fn download_directories(ctx: &Context, run: &mut RunContext) -> Vec<(Directory, bool)> {
    let mut directories = Vec::new();
    for root in &ctx.download_paths {
        match ctx.backend.walk(root) {
            Ok(walked) => directories.extend(walked.into_iter().map(|directory| {
                let is_root = directory.path == *root;
                (directory, is_root)
            })),
            Err(e) => run.report.error(format!("Could not walk downloads {}: {e}", root.display())),
        }
    }
    directories
}
