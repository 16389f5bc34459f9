//! Dataset sources: where articles come from.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{AnnotationError, Article, Result};

pub trait DatasetSource: Send + Sync {
    /// Names of the datasets that can be loaded.
    fn list(&self) -> Result<Vec<String>>;
    /// All rows of one dataset, in file order.
    fn read(&self, name: &str) -> Result<Vec<Article>>;
}

/// Rejects anything that could escape the directory it is resolved against.
pub(crate) fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

/// A directory of `.csv` files with a header row and at least a `content` column.
pub struct CsvDirectory {
    dir: PathBuf,
}

impl CsvDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DatasetSource for CsvDirectory {
    fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            tracing::warn!("Data directory '{}' does not exist", self.dir.display());
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            // empty files are not offered
            if entry.metadata()?.len() == 0 {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<Article>> {
        let path = self.dir.join(name);
        if !is_plain_file_name(name) || !path.is_file() {
            return Err(AnnotationError::NotFound(format!("File {name} not found")));
        }

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&path)?;
        let headers = reader.headers()?.clone();
        let column = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == wanted)
        };

        let content = column("content").ok_or_else(|| {
            AnnotationError::Validation(format!("'content' column not found in {name}"))
        })?;
        let headline = column("headline");
        let url = column("url");
        let date_published = column("date_published");

        let mut articles = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let field = |col: Option<usize>| {
                col.and_then(|c| record.get(c)).unwrap_or_default().to_string()
            };
            articles.push(Article {
                row,
                content: field(Some(content)),
                headline: field(headline),
                url: field(url),
                date_published: field(date_published),
            });
        }

        tracing::debug!("Read {} rows from {}", articles.len(), path.display());
        Ok(articles)
    }
}

/// Fixed datasets held in memory (for testing and demos)
#[derive(Clone, Default)]
pub struct InMemoryDatasets {
    data: BTreeMap<String, Vec<Article>>,
}

impl InMemoryDatasets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, articles: Vec<Article>) -> Self {
        self.data.insert(name.into(), articles);
        self
    }
}

impl DatasetSource for InMemoryDatasets {
    fn list(&self) -> Result<Vec<String>> {
        Ok(self.data.keys().cloned().collect())
    }

    fn read(&self, name: &str) -> Result<Vec<Article>> {
        self.data
            .get(name)
            .cloned()
            .ok_or_else(|| AnnotationError::NotFound(format!("File {name} not found")))
    }
}
