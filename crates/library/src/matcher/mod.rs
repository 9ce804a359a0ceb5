//! Finds the library folder a downloaded release belongs to.
//!
//! Lookups go from cheapest to most expensive, and the first hit wins:
//!
//! 1. a folder an archive identifier already matched this series to,
//! 2. the persisted [`PathCache`](tankobon_cache::PathCache), most recent
//!    and same-initial folders first,
//! 3. every folder below the library roots, with archive identifiers
//!    deciding between several name matches,
//! 4. archive identifiers of every library file.
//!
//! A name match needs the similarity of the normalized names to reach the
//! configured threshold and the folder's [`Profile`] to be compatible with
//! the batch the release arrived in. Identifier matches skip both checks.

mod identifiers;
mod normalize;
mod profile;
mod similarity;

use std::path::{Path, PathBuf};

use tankobon_extract::models::{Extension, ReleaseDescriptor};
use tracing::instrument;

pub use self::identifiers::{read_identifiers, shares_identifier};
pub use self::normalize::{Normalizer, looks_english};
pub use self::profile::Profile;
pub use self::similarity::similarity;
use crate::context::{Context, RunContext};
use crate::scan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Identifier,
    Cache,
    Walk,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched { folder: PathBuf, source: MatchSource },
    /// Several folders cleared the threshold; nobody should guess.
    Ambiguous(Vec<PathBuf>),
    Unmatched,
}

fn basename(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

/// Similarity of `query` (already normalized) to the folder's name, if it
/// reaches the threshold.
fn name_matches(ctx: &Context, query: &str, folder: &Path) -> bool {
    let candidate = ctx.normalizer.normalize(basename(folder));
    let score = similarity(query, &candidate);
    tracing::trace!(folder = %folder.display(), score, "Compared folder name");
    score >= ctx.similarity_threshold
}

/// Profile of the archives in `folder`, from their names alone.
fn folder_profile(ctx: &Context, folder: &Path) -> Option<Profile> {
    let directory = match ctx.backend.read_dir(folder) {
        Ok(directory) => directory,
        Err(e) => {
            tracing::debug!(folder = %folder.display(), error = %e, "Could not list candidate folder");
            return None;
        },
    };
    let mut profile = Profile::default();
    for file in &directory.files {
        if Extension::from_path(&file.path).is_some()
            && let Ok(release) = ctx.parser.release_file(&file.path)
        {
            profile.add(&release);
        }
    }
    Some(profile)
}

fn is_candidate(ctx: &Context, query: &str, folder: &Path, batch: &Profile) -> bool {
    name_matches(ctx, query, folder)
        && folder_profile(ctx, folder).is_some_and(|profile| profile.compatible(batch, ctx.matching_percentage))
}

/// Looks up the library folder for `descriptor`.
///
/// `batch` is the profile of the download directory the release came from.
/// Successful name and identifier matches are added to the path cache.
#[instrument(skip_all, fields(series = %descriptor.series_name))]
pub fn find_folder(ctx: &Context, run: &mut RunContext, descriptor: &ReleaseDescriptor, batch: &Profile) -> MatchOutcome {
    if let Some(folder) = run.identifier_match(&descriptor.series_name) {
        return MatchOutcome::Matched {
            folder: folder.to_path_buf(),
            source: MatchSource::Identifier,
        };
    }

    let query = ctx.normalizer.normalize(&descriptor.series_name);
    let cached: Vec<PathBuf> =
        run.cache.candidates_for(&descriptor.series_name).into_iter().map(Path::to_path_buf).collect();
    for folder in cached {
        if !ctx.library_paths.iter().any(|root| folder.starts_with(root)) || !name_matches(ctx, &query, &folder) {
            continue;
        }
        if !matches!(ctx.backend.exists(&folder), Ok(true)) {
            tracing::debug!(folder = %folder.display(), "Forgetting vanished cached folder");
            run.cache.forget(&folder);
            continue;
        }
        if folder_profile(ctx, &folder).is_some_and(|profile| profile.compatible(batch, ctx.matching_percentage)) {
            run.cache.promote(&folder);
            tracing::debug!(folder = %folder.display(), "Matched from path cache");
            return MatchOutcome::Matched {
                folder,
                source: MatchSource::Cache,
            };
        }
    }

    let mut matches: Vec<PathBuf> = scan::library_folders(ctx, run)
        .into_iter()
        .filter(|folder| is_candidate(ctx, &query, folder, batch))
        .collect();
    match matches.len() {
        0 => (),
        1 => {
            let folder = matches.remove(0);
            run.cache.insert(&folder);
            tracing::debug!(folder = %folder.display(), "Matched from library walk");
            return MatchOutcome::Matched {
                folder,
                source: MatchSource::Walk,
            };
        },
        _ => return settle_ambiguous(ctx, run, descriptor, matches),
    }

    let Some(wanted) = download_identifiers(ctx, run, descriptor) else {
        return MatchOutcome::Unmatched;
    };
    let found = scan::library_folders(ctx, run).into_iter().find(|folder| folder_shares_identifier(ctx, &wanted, folder));
    match found {
        Some(folder) => {
            tracing::info!(folder = %folder.display(), "Matched by archive identifier");
            remember_identifier_match(run, descriptor, &folder);
            MatchOutcome::Matched {
                folder,
                source: MatchSource::Identifier,
            }
        },
        None => MatchOutcome::Unmatched,
    }
}

/// Several folders cleared the name check; an archive identifier shared
/// with exactly one of them picks it.
fn settle_ambiguous(
    ctx: &Context,
    run: &mut RunContext,
    descriptor: &ReleaseDescriptor,
    candidates: Vec<PathBuf>,
) -> MatchOutcome {
    let Some(wanted) = download_identifiers(ctx, run, descriptor) else {
        return MatchOutcome::Ambiguous(candidates);
    };
    let sharing: Vec<&PathBuf> =
        candidates.iter().filter(|folder| folder_shares_identifier(ctx, &wanted, folder)).collect();
    let settled = match sharing.as_slice() {
        [folder] => Some(folder.to_path_buf()),
        _ => None,
    };
    match settled {
        Some(folder) => {
            tracing::info!(folder = %folder.display(), "Archive identifier settled an ambiguous match");
            remember_identifier_match(run, descriptor, &folder);
            MatchOutcome::Matched {
                folder,
                source: MatchSource::Identifier,
            }
        },
        None => MatchOutcome::Ambiguous(candidates),
    }
}

/// Identifiers of the downloaded archive; `None` when it has none or they
/// cannot be read (reported).
fn download_identifiers(ctx: &Context, run: &mut RunContext, descriptor: &ReleaseDescriptor) -> Option<Vec<String>> {
    match read_identifiers(ctx.backend.as_ref(), &descriptor.file.path) {
        Ok(wanted) if wanted.is_empty() => None,
        Ok(wanted) => Some(wanted),
        Err(e) => {
            run.report.error(format!("Could not read identifiers of {}: {e}", descriptor.file.path.display()));
            None
        },
    }
}

fn folder_shares_identifier(ctx: &Context, wanted: &[String], folder: &Path) -> bool {
    let Ok(directory) = ctx.backend.read_dir(folder) else {
        return false;
    };
    directory.files.iter().filter(|file| Extension::from_path(&file.path).is_some()).any(|file| {
        read_identifiers(ctx.backend.as_ref(), &file.path).is_ok_and(|identifiers| shares_identifier(wanted, &identifiers))
    })
}

fn remember_identifier_match(run: &mut RunContext, descriptor: &ReleaseDescriptor, folder: &Path) {
    run.remember_identifier_match(&descriptor.series_name, folder);
    run.cache.insert(folder);
}
