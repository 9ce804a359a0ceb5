mod consts;
pub mod error;
pub mod models;
mod parse;
mod vocabulary;

use std::path::Path;
use std::sync::LazyLock;

use tracing::instrument;

use crate::error::Result;
use crate::models::ReleaseDescriptor;
pub use crate::parse::{Parser, Placement, remove_brackets};
pub use crate::vocabulary::Vocabulary;

static DEFAULT_PARSER: LazyLock<Parser> = LazyLock::new(|| Parser::new(Vocabulary::default()).expect("the default vocabulary always compiles"));

/// Easy, top-level entrypoint describing an archive with the default
/// [`Vocabulary`].
///
/// Use a [`Parser`] directly to customise keywords or release groups.
///
/// ```rust
/// use tankobon_extract::{Placement, describe};
/// let descriptor = describe("/downloads/Alpha v05 (2022).cbz", Placement::default()).unwrap();
/// assert_eq!(descriptor.series_name, "Alpha");
/// assert_eq!(descriptor.year, Some(2022));
/// ```
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn describe(path: impl AsRef<Path>, placement: Placement) -> Result<ReleaseDescriptor> {
    DEFAULT_PARSER.describe_path(path, placement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary_compiles() {
        assert!(Parser::new(Vocabulary::default()).is_ok());
    }
}
