//! Layered configuration for tankobon.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. built-in defaults ([`Config::default`]),
//! 2. a TOML or YAML file (an explicit path, else `config.toml` in the
//!    platform configuration directory),
//! 3. environment variables prefixed `TANKOBON_`, with nested keys split on
//!    `__` (`TANKOBON_MATCHING__SIMILARITY_THRESHOLD=0.95`).

pub mod error;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tankobon_extract::Vocabulary;
use tankobon_extract::models::FileType;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

const ENV_PREFIX: &str = "TANKOBON_";

/// Default file name template; see the library crate's path generator.
pub const DEFAULT_TEMPLATE: &str = "{{ series }}{% if number %} {{ number }}{% endif %}{% if part %} Part {{ part }}{% endif %}{% if year %} ({{ year }}){% endif %}{% for extra in extras %} {{ extra }}{% endfor %}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Staging folders new releases are downloaded into.
    pub download_paths: Vec<PathBuf>,
    /// Library roots; every direct or nested folder is a series.
    pub library_paths: Vec<PathBuf>,
    /// Persisted path cache; defaults to the platform cache directory.
    pub cache_file: Option<PathBuf>,
    /// Where `changes.txt` and `errors.txt` are appended, if anywhere.
    pub log_dir: Option<PathBuf>,
    pub vocabulary: Vocabulary,
    /// Extra words removed before comparing series names.
    pub stopwords: Vec<String>,
    pub ranked_keywords: Vec<RankedKeyword>,
    pub matching: Matching,
    pub naming: Naming,
    pub features: Features,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            download_paths: Vec::new(),
            library_paths: Vec::new(),
            cache_file: project_dirs().map(|dirs| dirs.cache_dir().join("paths.txt")),
            log_dir: None,
            vocabulary: Vocabulary::default(),
            stopwords: Vec::new(),
            ranked_keywords: Vec::new(),
            matching: Matching::default(),
            naming: Naming::default(),
            features: Features::default(),
        }
    }
}

/// A scored pattern used to rank two releases of the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedKeyword {
    /// Regular expression matched case-insensitively against the file name.
    pub pattern: String,
    pub score: i32,
    /// Only applies to releases of this type when set.
    #[serde(default)]
    pub file_type: Option<FileType>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transliteration {
    /// Only when the name looks English.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Matching {
    /// Minimum similarity ratio, in `[0, 1]`, for a folder to match.
    pub similarity_threshold: f64,
    /// Minimum share, in percent, of files of one format or type for a
    /// folder and a batch to count as the same kind.
    pub matching_percentage: u8,
    pub transliteration: Transliteration,
}
impl Default for Matching {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.98,
            matching_percentage: 90,
            transliteration: Transliteration::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Naming {
    pub template: String,
}
impl Default for Naming {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub rename_downloads: bool,
    pub check_existing: bool,
    pub check_duplicates: bool,
    pub check_missing: bool,
    pub extract_covers: bool,
}
impl Default for Features {
    fn default() -> Self {
        Self {
            rename_downloads: false,
            check_existing: true,
            check_duplicates: false,
            check_missing: false,
            extract_covers: false,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "tankobon")
}

/// `config.toml` in the platform configuration directory.
pub fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Config {
    /// Builds the layered [`Figment`] without extracting it.
    ///
    /// Files ending in `.yaml`/`.yml` are read as YAML, anything else as
    /// TOML. A missing default file is silently skipped.
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file.map(Path::to_path_buf).or_else(default_config_file) {
            let is_yaml = file.extension().and_then(|e| e.to_str()).is_some_and(|e| matches!(e, "yaml" | "yml"));
            figment = match is_yaml {
                true => figment.merge(Yaml::file(file)),
                false => figment.merge(Toml::file(file)),
            };
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads the configuration from every source.
    ///
    /// An explicit `file` must exist; the default location is optional.
    #[instrument]
    pub fn load(file: Option<&Path>) -> Result<Self> {
        if let Some(file) = file
            && !file.is_file()
        {
            exn::bail!(ErrorKind::NotFound(file.to_path_buf()));
        }
        Self::extract(Self::figment(file))
    }

    pub fn extract(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract().or_raise(|| ErrorKind::Load)?;
        tracing::debug!(
            downloads = config.download_paths.len(),
            libraries = config.library_paths.len(),
            keywords = config.ranked_keywords.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Every problem with the configuration, in field order.
    ///
    /// None of these are fatal on their own; the caller decides which
    /// features to skip. [`ErrorKind::NoPaths`] is the only problem that
    /// should halt a run.
    pub fn validate(&self) -> Vec<ErrorKind> {
        let mut problems = Vec::new();
        if self.download_paths.is_empty() && self.library_paths.is_empty() {
            problems.push(ErrorKind::NoPaths);
        }
        let paths = (self.download_paths.iter().map(|p| ("download_paths", p)))
            .chain(self.library_paths.iter().map(|p| ("library_paths", p)))
            .chain(self.cache_file.iter().map(|p| ("cache_file", p)))
            .chain(self.log_dir.iter().map(|p| ("log_dir", p)));
        for (field, path) in paths {
            if !path.is_absolute() {
                problems.push(ErrorKind::RelativePath {
                    field,
                    path: path.clone(),
                });
            }
        }
        let threshold = self.matching.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            problems.push(ErrorKind::OutOfRange {
                field: "matching.similarity_threshold",
                value: threshold,
            });
        }
        if self.matching.matching_percentage > 100 {
            problems.push(ErrorKind::OutOfRange {
                field: "matching.matching_percentage",
                value: f64::from(self.matching.matching_percentage),
            });
        }
        let vocabulary = &self.vocabulary;
        let patterns = (vocabulary.volume_keywords.iter().map(|p| ("vocabulary.volume_keywords", p)))
            .chain(vocabulary.chapter_keywords.iter().map(|p| ("vocabulary.chapter_keywords", p)))
            .chain(vocabulary.exception_keywords.iter().map(|p| ("vocabulary.exception_keywords", p)))
            .chain(self.ranked_keywords.iter().map(|k| ("ranked_keywords", &k.pattern)));
        for (field, pattern) in patterns {
            if Regex::new(pattern).is_err() {
                problems.push(ErrorKind::InvalidPattern {
                    field,
                    pattern: pattern.clone(),
                });
            }
        }
        problems
    }
}
