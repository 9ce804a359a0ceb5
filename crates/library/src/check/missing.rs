//! Reports gaps in the volume numbering of each series folder.

use std::ops::RangeInclusive;

use tankobon_extract::models::{FileType, ReleaseDescriptor};
use tracing::instrument;

use crate::context::{Context, RunContext};
use crate::report::MissingVolumes;
use crate::scan;

/// Most numbers reported for one folder; a name like `v1-999999999` must
/// not turn into a billion-entry report.
pub const REPORT_LIMIT: usize = 1000;

/// Whole volume numbers between the lowest and highest held that no
/// release holds, at most [`REPORT_LIMIT`] of them. Multi-volume releases
/// hold every number in their range.
pub fn missing_numbers<'a>(releases: impl IntoIterator<Item = &'a ReleaseDescriptor>) -> Vec<u32> {
    let mut spans: Vec<RangeInclusive<u32>> = releases
        .into_iter()
        .filter(|release| release.file_type() == FileType::Volume)
        .filter_map(|release| release.number.as_ref())
        .flat_map(|number| number.integer_spans())
        .collect();
    spans.sort_by_key(|span| *span.start());

    let mut missing = Vec::new();
    // First number past everything held so far.
    let mut next: Option<u32> = None;
    for span in spans {
        if let Some(from) = next
            && from < *span.start()
        {
            let room = REPORT_LIMIT - missing.len();
            missing.extend((from..*span.start()).take(room));
        }
        let after = span.end().saturating_add(1);
        next = Some(next.map_or(after, |n| n.max(after)));
    }
    if missing.len() == REPORT_LIMIT {
        tracing::warn!(limit = REPORT_LIMIT, "Truncated missing volume numbers");
    }
    missing
}

#[instrument(skip_all)]
pub fn check_missing(ctx: &Context, run: &mut RunContext) {
    for folder in scan::library_folders(ctx, run) {
        let releases = scan::describe_folder(ctx, run, &folder);
        let numbers = missing_numbers(&releases);
        if numbers.is_empty() {
            continue;
        }
        tracing::info!(folder = %folder.display(), missing = ?numbers, "Volumes missing");
        run.report.missing(MissingVolumes { folder, numbers });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;
    use rstest::rstest;
    use std::path::{Path, PathBuf};
    use tankobon_extract::{Placement, describe};

    #[rstest]
    #[case::gap(&["Alpha v01.cbz", "Alpha v04.cbz"], vec![2, 3])]
    #[case::complete(&["Alpha v01.cbz", "Alpha v02.cbz"], vec![])]
    #[case::range_fills(&["Alpha v01-03.cbz", "Alpha v05.cbz"], vec![4])]
    #[case::decimal_ignored(&["Alpha v01.cbz", "Alpha v01.5.cbz", "Alpha v03.cbz"], vec![2])]
    #[case::chapters_ignored(&["Alpha c001.cbz", "Alpha c005.cbz"], vec![])]
    #[case::empty(&[], vec![])]
    #[case::huge_range(&["Alpha v1-999999999.cbz"], vec![])]
    #[case::overlapping_ranges(&["Alpha v01-05.cbz", "Alpha v02-03.cbz", "Alpha v07.cbz"], vec![6])]
    fn test_missing_numbers(#[case] names: &[&str], #[case] expected: Vec<u32>) {
        let releases: Vec<ReleaseDescriptor> = names
            .iter()
            .map(|name| describe(Path::new("/library/Alpha").join(name), Placement::default()).unwrap())
            .collect();
        assert_eq!(missing_numbers(&releases), expected);
    }

    #[test]
    fn test_huge_gap_is_truncated() {
        let releases = ["Alpha v01.cbz", "Alpha v999999999.cbz"]
            .map(|name| describe(Path::new("/library/Alpha").join(name), Placement::default()).unwrap());
        let missing = missing_numbers(&releases);
        assert_eq!(missing.len(), REPORT_LIMIT);
        assert_eq!(missing[0], 2);
    }

    #[test]
    fn test_check_missing_reports_only() {
        let harness = Harness::new([("/library/Alpha/Alpha v01.cbz", "1"), ("/library/Alpha/Alpha v03.cbz", "3")]);
        let before = harness.files();
        let mut run = RunContext::default();
        check_missing(&harness.ctx, &mut run);

        assert_eq!(harness.files(), before);
        assert_eq!(
            run.report.missing_volumes(),
            &[MissingVolumes {
                folder: PathBuf::from("/library/Alpha"),
                numbers: vec![2]
            }]
        );
    }
}
