//! Export artifacts: one CSV file per source dataset per export.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::dataset::is_plain_file_name;
use crate::{AnnotationError, ExportRow, Result};

pub trait ArtifactSink: Send + Sync {
    /// Store `rows` for `source_file`; returns the artifact name.
    fn write(&self, source_file: &str, rows: &[ExportRow]) -> Result<String>;
    /// Raw bytes of a previously written artifact.
    fn read(&self, name: &str) -> Result<Vec<u8>>;
}

/// CSV bytes for `rows`, header first.
pub fn encode_rows(rows: &[ExportRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| AnnotationError::Io(e.into_error()))
}

/// `annotated_phrases_<stem>_<YYYYmmdd_HHMMSS>`, without extension.
fn artifact_base(source_file: &str) -> String {
    let stem = source_file.strip_suffix(".csv").unwrap_or(source_file);
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("annotated_phrases_{stem}_{stamp}")
}

fn candidate_name(base: &str, attempt: usize) -> String {
    if attempt == 0 {
        format!("{base}.csv")
    } else {
        format!("{base}_{attempt}.csv")
    }
}

// A partial artifact must not stay downloadable.
fn write_or_remove(path: &Path, mut out: impl Write, bytes: &[u8]) -> Result<()> {
    if let Err(e) = out.write_all(bytes).and_then(|_| out.flush()) {
        if let Err(rm) = fs::remove_file(path) {
            tracing::warn!("Error removing partial artifact {}: {rm}", path.display());
        }
        return Err(e.into());
    }
    Ok(())
}

/// Results directory on disk. Never overwrites an earlier artifact.
pub struct ResultsDir {
    dir: PathBuf,
}

impl ResultsDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for ResultsDir {
    fn write(&self, source_file: &str, rows: &[ExportRow]) -> Result<String> {
        fs::create_dir_all(&self.dir)?;
        let bytes = encode_rows(rows)?;
        let base = artifact_base(source_file);

        let mut attempt = 0;
        loop {
            let name = candidate_name(&base, attempt);
            let path = self.dir.join(&name);
            let file = OpenOptions::new().write(true).create_new(true).open(&path);
            match file {
                Ok(f) => {
                    write_or_remove(&path, f, &bytes)?;
                    return Ok(name);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.dir.join(name);
        if !is_plain_file_name(name) || !path.is_file() {
            return Err(AnnotationError::NotFound(format!("File {name} not found")));
        }
        Ok(fs::read(path)?)
    }
}

/// Artifacts kept in memory (for testing and demos)
#[derive(Clone, Default)]
pub struct InMemoryArtifacts {
    data: Arc<RwLock<BTreeMap<String, Vec<ExportRow>>>>,
}

impl InMemoryArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<String> {
        self.data
            .read()
            .map(|d| d.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn rows(&self, name: &str) -> Option<Vec<ExportRow>> {
        self.data.read().ok().and_then(|d| d.get(name).cloned())
    }
}

impl ArtifactSink for InMemoryArtifacts {
    fn write(&self, source_file: &str, rows: &[ExportRow]) -> Result<String> {
        let mut data = self
            .data
            .write()
            .map_err(|_| AnnotationError::Persistence("artifact lock poisoned".into()))?;
        let base = artifact_base(source_file);
        let name = (0..)
            .map(|attempt| candidate_name(&base, attempt))
            .find(|name| !data.contains_key(name))
            .unwrap_or_else(|| candidate_name(&base, 0));
        data.insert(name.clone(), rows.to_vec());
        Ok(name)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let rows = self
            .rows(name)
            .ok_or_else(|| AnnotationError::NotFound(format!("File {name} not found")))?;
        encode_rows(&rows)
    }
}
