//! Input adapters: a recursive folder scan and a CSV list of posts.
//!
//! Both produce [`RawDocument`]s and apply an [`ErrorPolicy`] to read failures,
//! so the engine is written once against [`DocumentFeed`].

use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::resolve_with_base;
use crate::error::{Error, Result};
use crate::policy::{Disposition, ErrorPolicy};
use crate::traits::DocumentFeed;
use crate::types::{Metadata, RawDocument};

/// Every file under `root` whose path matches `pattern`.
#[derive(Debug, Clone)]
pub struct FolderFeed {
    root: PathBuf,
    pattern: Regex,
    lang: String,
    policy: ErrorPolicy,
}

impl FolderFeed {
    pub fn new(root: impl Into<PathBuf>, pattern: &str, lang: impl Into<String>) -> Result<Self> {
        Ok(Self { root: root.into(), pattern: Regex::new(pattern)?, lang: lang.into(), policy: ErrorPolicy::default() })
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn matches(&self, path: &Path) -> bool {
        self.pattern.is_match(&path.to_string_lossy())
    }

    fn keep(&self, docs: &mut Vec<RawDocument>, source: String, disposition: Disposition) {
        if disposition == Disposition::KeepEmpty {
            docs.push(RawDocument::new(source, Vec::new(), self.lang.as_str()));
        }
    }
}

impl DocumentFeed for FolderFeed {
    fn documents(&self) -> Result<Vec<RawDocument>> {
        if !self.root.is_dir() {
            return Err(Error::NotFound(format!("no such directory: {}", self.root.display())));
        }
        let mut docs = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
                    let source = path.to_string_lossy().into_owned();
                    let cause = err.into_io_error().unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop"));
                    let disposition = self.policy.on_unreadable(&source, Error::io(&path, cause))?;
                    // Dangling links and unreadable files only; a failing directory is not a document.
                    if self.matches(&path) && !path.is_dir() {
                        self.keep(&mut docs, source, disposition);
                    }
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.matches(entry.path()) {
                continue;
            }
            let source = entry.path().to_string_lossy().into_owned();
            match fs::read(entry.path()) {
                Ok(content) => {
                    tracing::debug!(source = %source, bytes = content.len(), "read document");
                    docs.push(RawDocument::new(source, content, self.lang.as_str()));
                }
                Err(err) => {
                    let disposition = self.policy.on_unreadable(&source, Error::io(entry.path(), err))?;
                    self.keep(&mut docs, source, disposition);
                }
            }
        }
        tracing::info!(root = %self.root.display(), documents = docs.len(), "folder scanned");
        Ok(docs)
    }
}

/// A headerless CSV of `url, path, title, description, thumbnail` records,
/// as exported by a Jekyll site. Relative paths resolve against the list's
/// own directory.
#[derive(Debug, Clone)]
pub struct ListFeed {
    list: PathBuf,
    base_dir: PathBuf,
    lang: String,
    policy: ErrorPolicy,
}

impl ListFeed {
    pub fn new(list: impl Into<PathBuf>, lang: impl Into<String>) -> Self {
        let list = list.into();
        let base_dir = list.parent().map(Path::to_path_buf).unwrap_or_default();
        Self { list, base_dir, lang: lang.into(), policy: ErrorPolicy::default() }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }
}

fn non_empty(field: Option<&str>) -> Option<String> {
    field.filter(|s| !s.is_empty()).map(str::to_string)
}

impl DocumentFeed for ListFeed {
    fn documents(&self) -> Result<Vec<RawDocument>> {
        let file = fs::File::open(&self.list).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound(format!("no such post list: {}", self.list.display())),
            _ => Error::io(&self.list, e),
        })?;
        let mut reader = csv::ReaderBuilder::new().has_headers(false).flexible(true).trim(csv::Trim::All).from_reader(file);

        let mut docs = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let at = format!("{}:{}", self.list.display(), line + 1);
            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    self.policy.on_malformed_record(&at, err.into())?;
                    continue;
                }
            };
            let (url, path) = match (non_empty(record.get(0)), non_empty(record.get(1))) {
                (Some(url), Some(path)) => (url, path),
                _ => {
                    let err = Error::Operation(format!("record needs at least a url and a path, got {} field(s)", record.len()));
                    self.policy.on_malformed_record(&at, err)?;
                    continue;
                }
            };
            let meta = Metadata {
                url: Some(url),
                title: non_empty(record.get(2)),
                description: non_empty(record.get(3)),
                thumbnail: non_empty(record.get(4)),
            };
            let full_path = resolve_with_base(&self.base_dir, &path);
            let content = match fs::read(&full_path) {
                Ok(content) => content,
                Err(err) => match self.policy.on_unreadable(&path, Error::io(&full_path, err))? {
                    Disposition::Drop => continue,
                    Disposition::KeepEmpty => Vec::new(),
                },
            };
            docs.push(RawDocument::new(path, content, self.lang.as_str()).with_meta(meta));
        }
        tracing::info!(list = %self.list.display(), documents = docs.len(), "post list read");
        Ok(docs)
    }
}
