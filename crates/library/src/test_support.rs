//! Shared fixtures for tests running against [`MockBackend`].

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tankobon_config::{Config, RankedKeyword};
use tankobon_storage::BackendHandle;
use tankobon_storage::backend::MockBackend;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::context::Context;
use crate::notify::{Event, Recorder};

pub(crate) struct Harness {
    pub ctx: Context,
    pub backend: Arc<MockBackend>,
    pub recorder: Arc<Recorder>,
}

impl Harness {
    pub fn new<'a>(files: impl IntoIterator<Item = (&'a str, impl Into<Vec<u8>>)>) -> Self {
        Self::with_config(MockBackend::with_files(files), config())
    }

    pub fn with_config(backend: MockBackend, config: Config) -> Self {
        let backend = Arc::new(backend.with_directories(["/downloads", "/library"]));
        let recorder = Arc::new(Recorder::default());
        let handle: BackendHandle = backend.clone();
        let ctx = Context::from_config(&config, handle, recorder.clone()).unwrap();
        Self {
            ctx,
            backend,
            recorder,
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.recorder.events()
    }

    pub fn files(&self) -> Vec<String> {
        self.backend.files().iter().map(|p| p.to_string_lossy().into_owned()).collect()
    }
}

pub(crate) fn keyword(pattern: &str, score: i32) -> RankedKeyword {
    RankedKeyword {
        pattern: pattern.to_string(),
        score,
        file_type: None,
    }
}

pub(crate) fn config() -> Config {
    Config {
        download_paths: vec![PathBuf::from("/downloads")],
        library_paths: vec![PathBuf::from("/library")],
        cache_file: None,
        ranked_keywords: vec![keyword(r"\(Digital\)", 1), keyword(r"\(Scan\)", -5)],
        ..Config::default()
    }
}

/// A minimal archive with one page and an optional comment.
pub(crate) fn archive(entries: &[&str], comment: Option<&str>) -> Vec<u8> {
    let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for name in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(name.as_bytes()).unwrap();
    }
    if let Some(comment) = comment {
        writer.set_comment(comment);
    }
    writer.finish().unwrap().into_inner()
}
