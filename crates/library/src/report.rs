//! Human-readable record of a run.
//!
//! Two streams, "changes" and "errors", collect one line per event. At the
//! end of a run they are summarized and appended to `changes.txt` and
//! `errors.txt` in the log directory.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use exn::ResultExt;
use tankobon_storage::StorageBackend;
use time::UtcDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::{ErrorKind, Result};

pub const CHANGES_FILE: &str = "changes.txt";
pub const ERRORS_FILE: &str = "errors.txt";

/// Integral volume numbers absent from a series folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingVolumes {
    pub folder: PathBuf,
    pub numbers: Vec<u32>,
}

#[derive(Debug, Default)]
pub struct RunReport {
    changes: Vec<String>,
    errors: Vec<String>,
    missing: Vec<MissingVolumes>,
}

impl RunReport {
    pub fn change(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!(%line, "Change recorded");
        self.changes.push(line);
    }

    /// Records a per-file failure; the run carries on.
    pub fn error(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::warn!(%line, "Error recorded");
        self.errors.push(line);
    }

    pub fn missing(&mut self, missing: MissingVolumes) {
        self.missing.push(missing);
    }

    pub fn changes(&self) -> &[String] {
        &self.changes
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn missing_volumes(&self) -> &[MissingVolumes] {
        &self.missing
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.errors.is_empty() && self.missing.is_empty()
    }

    /// End-of-run summary for the terminal.
    pub fn summary(&self) -> String {
        let mut out = format!("{} change(s), {} error(s)\n", self.changes.len(), self.errors.len());
        for line in &self.changes {
            _ = writeln!(out, "  + {line}");
        }
        for line in &self.errors {
            _ = writeln!(out, "  ! {line}");
        }
        for missing in &self.missing {
            let numbers = missing.numbers.iter().map(u32::to_string).collect::<Vec<_>>().join(", ");
            _ = writeln!(out, "  ? {}: missing {numbers}", missing.folder.display());
        }
        out
    }

    /// Appends both streams, timestamped, to the log files in `dir`.
    pub fn persist(&self, backend: &dyn StorageBackend, dir: &Path) -> Result<()> {
        let timestamp = UtcDateTime::now().format(&Rfc3339).or_raise(|| ErrorKind::Storage)?;
        append(backend, &dir.join(CHANGES_FILE), &timestamp, &self.changes)?;
        append(backend, &dir.join(ERRORS_FILE), &timestamp, &self.errors)?;
        Ok(())
    }
}

fn append(backend: &dyn StorageBackend, file: &Path, timestamp: &str, lines: &[String]) -> Result<()> {
    if lines.is_empty() {
        return Ok(());
    }
    let mut contents = match backend.read(file) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.is_not_found() => String::new(),
        Err(e) => return Err(e).or_raise(|| ErrorKind::Storage),
    };
    for line in lines {
        _ = writeln!(contents, "{timestamp} {line}");
    }
    backend.write(file, contents.as_bytes()).or_raise(|| ErrorKind::Storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tankobon_storage::backend::MockBackend;

    #[test]
    fn test_persist_appends() {
        let backend = MockBackend::with_files([("/logs/changes.txt", b"earlier line\n".to_vec())]);
        let mut report = RunReport::default();
        report.change("Moved Alpha v01.cbz");
        report.persist(&backend, Path::new("/logs")).unwrap();

        let changes = String::from_utf8(backend.read(Path::new("/logs/changes.txt")).unwrap()).unwrap();
        let lines: Vec<&str> = changes.lines().collect();
        assert_eq!(lines[0], "earlier line");
        assert!(lines[1].ends_with(" Moved Alpha v01.cbz"));
        // Nothing to report, nothing written.
        assert!(!backend.exists(Path::new("/logs/errors.txt")).unwrap());
    }

    #[test]
    fn test_summary_counts() {
        let mut report = RunReport::default();
        assert!(report.is_empty());
        report.error("Could not parse x.cbz");
        report.missing(MissingVolumes {
            folder: PathBuf::from("/library/Alpha"),
            numbers: vec![2, 4],
        });
        let summary = report.summary();
        assert!(summary.starts_with("0 change(s), 1 error(s)"));
        assert!(summary.contains("/library/Alpha: missing 2, 4"));
    }
}
