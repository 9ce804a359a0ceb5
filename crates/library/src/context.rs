use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use exn::ResultExt;
use tankobon_cache::PathCache;
use tankobon_config::Config;
use tankobon_extract::Parser;
use tankobon_extract::models::{Extension, FileType, ReleaseDescriptor};
use tankobon_storage::BackendHandle;

use crate::PathGenerator;
use crate::error::{ErrorKind, Result};
use crate::matcher::Normalizer;
use crate::notify::Notifier;
use crate::report::RunReport;
use crate::upgrade::Scorer;

/// Everything a run needs that does not change while it runs.
pub struct Context {
    pub backend: BackendHandle,
    pub parser: Parser,
    pub template: PathGenerator,
    pub scorer: Scorer,
    pub normalizer: Normalizer,
    pub similarity_threshold: f64,
    pub matching_percentage: u8,
    pub download_paths: Vec<PathBuf>,
    pub library_paths: Vec<PathBuf>,
    pub notifier: Arc<dyn Notifier>,
}

impl Context {
    /// Compiles the parser, template and keyword table from `config`.
    pub fn from_config(config: &Config, backend: BackendHandle, notifier: Arc<dyn Notifier>) -> Result<Self> {
        Ok(Self {
            backend,
            parser: Parser::new(config.vocabulary.clone()).or_raise(|| ErrorKind::Vocabulary)?,
            template: config.naming.template.parse()?,
            scorer: Scorer::new(&config.ranked_keywords)?,
            normalizer: Normalizer::new(&config.stopwords, config.matching.transliteration),
            similarity_threshold: config.matching.similarity_threshold,
            matching_percentage: config.matching.matching_percentage,
            download_paths: config.download_paths.clone(),
            library_paths: config.library_paths.clone(),
            notifier,
        })
    }

    pub fn is_download_path(&self, path: &Path) -> bool {
        self.download_paths.iter().any(|root| path.starts_with(root))
    }
}

/// Series, type and extension of a release nothing matched this run.
type SkipKey = (String, FileType, Extension);

/// Mutable state scoped to one run, discarded when it ends.
#[derive(Debug, Default)]
pub struct RunContext {
    pub cache: PathCache,
    pub report: RunReport,
    skipped: HashSet<SkipKey>,
    /// Series name to the folder an archive identifier matched it to.
    identifier_matches: HashMap<String, PathBuf>,
    /// Files deleted or moved away this run, even when the attempt failed.
    gone: HashSet<PathBuf>,
    /// Every non-root folder below the library paths, walked once.
    library_folders: Option<Vec<PathBuf>>,
}

impl RunContext {
    pub fn new(cache: PathCache) -> Self {
        Self {
            cache,
            ..Self::default()
        }
    }

    pub(crate) fn skip_key(descriptor: &ReleaseDescriptor) -> SkipKey {
        (descriptor.series_name.to_lowercase(), descriptor.file_type(), descriptor.file.extension)
    }

    pub fn is_skipped(&self, descriptor: &ReleaseDescriptor) -> bool {
        self.skipped.contains(&Self::skip_key(descriptor))
    }

    pub fn skip(&mut self, descriptor: &ReleaseDescriptor) {
        self.skipped.insert(Self::skip_key(descriptor));
    }

    pub fn identifier_match(&self, series: &str) -> Option<&Path> {
        self.identifier_matches.get(&series.to_lowercase()).map(PathBuf::as_path)
    }

    pub fn remember_identifier_match(&mut self, series: &str, folder: impl Into<PathBuf>) {
        self.identifier_matches.insert(series.to_lowercase(), folder.into());
    }

    pub fn mark_gone(&mut self, path: impl Into<PathBuf>) {
        self.gone.insert(path.into());
    }

    pub fn is_gone(&self, path: &Path) -> bool {
        self.gone.contains(path)
    }

    pub(crate) fn library_folders(&self) -> Option<&[PathBuf]> {
        self.library_folders.as_deref()
    }

    pub(crate) fn set_library_folders(&mut self, folders: Vec<PathBuf>) {
        self.library_folders = Some(folders);
    }
}
