//! File naming for releases the library moves or renames.
//!
//! Converts a [`ReleaseDescriptor`] into a deterministic file name using a
//! user-configured [upon] template. The template syntax follows upon's
//! Mustache-like conventions (`{{ variable }}`, `{% if .. %}`), extended with
//! a `truncate` function for overly long series names.
//!
//! # Template Variables
//!
//! | Variable  | Type             | Description                                   |
//! |-----------|------------------|-----------------------------------------------|
//! | `series`  | `String`         | Series name (or the library folder's name)    |
//! | `number`  | `Option<String>` | Formatted number: `v01`, `v01-03`, `c012.5`   |
//! | `part`    | `Option<String>` | Part of a volume                              |
//! | `year`    | `Option<String>` | Release year                                  |
//! | `group`   | `Option<String>` | Release group                                 |
//! | `extras`  | `[String]`       | Bracketed extras, Premium first               |
//! | `oneshot` | `bool`           | Whether the release is a one-shot             |
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use tankobon_extract::{Placement, describe};
//! use tankobon_library::PathGenerator;
//!
//! let descriptor = describe(Path::new("/downloads/Alpha Vol 01 (2022) [Digital].cbz"), Placement::default()).unwrap();
//! let generator: PathGenerator = "{{ series }} {{ number }}{% if year %} ({{ year }}){% endif %}".parse().unwrap();
//! assert_eq!(generator.file_name(&descriptor, None).unwrap(), "Alpha v01 (2022).cbz");
//! ```

use crate::error::{Error, ErrorKind, Result};
use exn::ResultExt;
use std::str::FromStr;
use tankobon_extract::models::ReleaseDescriptor;
use tracing::instrument;
use upon::{Engine, Template};

/// Generates file names from [`ReleaseDescriptor`]s and a template string.
///
/// Constructed via [`FromStr`], which compiles the template eagerly so that
/// syntax errors surface at creation time rather than at render time.
pub struct PathGenerator {
    engine: Engine<'static>,
    template: Template<'static>,
}
impl FromStr for PathGenerator {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        let template = engine.compile(s.to_string()).or_raise(|| ErrorKind::Template)?;
        Ok(Self { engine, template })
    }
}
impl std::fmt::Debug for PathGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathGenerator").finish_non_exhaustive()
    }
}
impl PathGenerator {
    /// Renders the file name (with extension) for `descriptor`.
    ///
    /// `series` overrides the descriptor's own series name; moves into a
    /// library folder pass the folder's name so its spelling wins.
    #[instrument(level = "debug", skip_all, fields(file = %descriptor.file.name))]
    pub fn file_name(&self, descriptor: &ReleaseDescriptor, series: Option<&str>) -> Result<String> {
        let rendered = self
            .template
            .render(&self.engine, Self::parameters(descriptor, series))
            .to_string()
            .or_raise(|| ErrorKind::Template)?;
        let stem = Self::normalize(&rendered);
        if stem.is_empty() {
            exn::bail!(ErrorKind::Template);
        }
        Ok(format!("{stem}.{}", descriptor.file.extension))
    }

    /// Collapses whitespace and drops path separators so the result is a
    /// single path segment.
    fn normalize(s: &str) -> String {
        let cleaned = s.replace(['/', '\\'], " ");
        let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
        collapsed.trim_matches(|c: char| c == '.' || c == '-' || c.is_whitespace()).to_string()
    }

    fn parameters(descriptor: &ReleaseDescriptor, series: Option<&str>) -> upon::Value {
        let file_type = descriptor.file_type();
        let number = descriptor.number.as_ref().map(|n| n.format(file_type.prefix(), file_type.width()));
        upon::value! {
            series: series.unwrap_or(&descriptor.series_name),
            number: number,
            part: descriptor.part.map(|p| p.to_string()),
            year: descriptor.year.map(|y| y.to_string()),
            group: descriptor.release_group.clone(),
            extras: descriptor.extras.clone(),
            oneshot: descriptor.is_one_shot,
        }
    }
}

/// Custom [`upon`] extensions for file-name manipulation.
mod addons {
    use upon::Engine;

    /// Truncates a string to a maximum byte length at a character boundary,
    /// trimming whatever whitespace is left dangling.
    fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> String {
        s[..s.floor_char_boundary(max_bytes)].trim_end().to_string()
    }

    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.add_function("truncate", truncate_to_char_boundary);
    }
}
