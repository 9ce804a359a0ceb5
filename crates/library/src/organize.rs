//! Carries out file operations decided elsewhere.
//!
//! Destructive operations are never retried. When one fails the remaining
//! actions of the batch are abandoned, but the files involved are still
//! marked gone in the [`RunContext`] so later passes do not process them
//! again.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

use exn::ResultExt;

use crate::context::{Context, RunContext};
use crate::error::{ErrorKind, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Delete(PathBuf),
    /// Rename/move; never overwrites.
    Move { from: PathBuf, to: PathBuf },
    /// Write a new file, such as an extracted cover.
    Write { path: PathBuf, data: Vec<u8> },
}

impl Action {
    /// The file this action makes disappear, if any.
    fn removes(&self) -> Option<&Path> {
        match self {
            Self::Delete(path) => Some(path.as_path()),
            Self::Move { from, .. } => Some(from.as_path()),
            Self::Write { .. } => None,
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Delete(path) => write!(f, "Deleted {}", path.display()),
            Self::Move { from, to } => write!(f, "Moved {} to {}", from.display(), to.display()),
            Self::Write { path, data } => write!(f, "Wrote {} ({} bytes)", path.display(), data.len()),
        }
    }
}

fn apply(ctx: &Context, action: &Action) -> Result<()> {
    let backend = ctx.backend.as_ref();
    match action {
        Action::Delete(path) => backend.delete(path).or_raise(|| ErrorKind::Storage),
        Action::Move { from, to } => match backend.rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) if matches!(&*e, tankobon_storage::error::ErrorKind::AlreadyExists(_)) => {
                Err(e).or_raise(|| ErrorKind::Conflict(to.clone()))
            },
            Err(e) => Err(e).or_raise(|| ErrorKind::Storage),
        },
        Action::Write { path, data } => backend.write(path, data).or_raise(|| ErrorKind::Storage),
    }
}

/// Runs `actions` in order, recording each one in the report.
///
/// Returns `false` if an action failed; later actions are skipped.
pub fn execute(ctx: &Context, run: &mut RunContext, actions: &[Action]) -> bool {
    for action in actions {
        if let Some(path) = action.removes() {
            run.mark_gone(path);
        }
        match apply(ctx, action) {
            Ok(()) => {
                tracing::info!(%action, "Applied");
                run.report.change(action.to_string());
            },
            Err(e) => {
                run.report.error(format!("{action} failed: {e}"));
                return false;
            },
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;
    use tankobon_storage::backend::StorageBackend;

    #[test]
    fn test_moves_and_deletes() {
        let harness = Harness::new([("/downloads/a.cbz", "a"), ("/library/A/old.cbz", "old")]);
        let mut run = RunContext::default();
        let actions = [
            Action::Delete(PathBuf::from("/library/A/old.cbz")),
            Action::Move {
                from: PathBuf::from("/downloads/a.cbz"),
                to: PathBuf::from("/library/A/a.cbz"),
            },
        ];
        assert!(execute(&harness.ctx, &mut run, &actions));
        assert_eq!(harness.backend.files(), vec![PathBuf::from("/library/A/a.cbz")]);
        assert_eq!(run.report.changes().len(), 2);
        assert!(run.is_gone(Path::new("/downloads/a.cbz")));
    }

    #[test]
    fn test_stops_at_first_failure() {
        let harness = Harness::new([("/downloads/a.cbz", "a"), ("/library/A/a.cbz", "other")]);
        let mut run = RunContext::default();
        let actions = [
            Action::Move {
                from: PathBuf::from("/downloads/a.cbz"),
                to: PathBuf::from("/library/A/a.cbz"),
            },
            Action::Delete(PathBuf::from("/library/A/a.cbz")),
        ];
        assert!(!execute(&harness.ctx, &mut run, &actions));
        // Nothing overwritten, nothing deleted.
        assert!(harness.backend.exists(Path::new("/downloads/a.cbz")).unwrap());
        assert_eq!(harness.backend.read(Path::new("/library/A/a.cbz")).unwrap(), b"other");
        assert_eq!(run.report.errors().len(), 1);
        // Still marked, so later passes leave it alone.
        assert!(run.is_gone(Path::new("/downloads/a.cbz")));
    }
}
