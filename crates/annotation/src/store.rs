//! Progress store trait and implementations

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::{AnnotationError, ProgressSnapshot, Result};

/// Reads and writes the full progress snapshot.
pub trait ProgressStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<ProgressSnapshot>>;
    fn save(&self, snapshot: &ProgressSnapshot) -> Result<()>;
}

/// In-memory store (for testing and demos)
#[derive(Clone, Default)]
pub struct InMemoryProgressStore {
    data: Arc<RwLock<Option<ProgressSnapshot>>>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: ProgressSnapshot) -> Self {
        Self {
            data: Arc::new(RwLock::new(Some(snapshot))),
        }
    }

    /// Last saved snapshot, shared across clones of this handle.
    pub fn saved(&self) -> Option<ProgressSnapshot> {
        self.data.read().ok().and_then(|d| d.clone())
    }
}

impl ProgressStore for InMemoryProgressStore {
    fn load(&self) -> Result<Option<ProgressSnapshot>> {
        let data = self
            .data
            .read()
            .map_err(|_| AnnotationError::Persistence("progress lock poisoned".into()))?;
        Ok(data.clone())
    }

    fn save(&self, snapshot: &ProgressSnapshot) -> Result<()> {
        let mut data = self
            .data
            .write()
            .map_err(|_| AnnotationError::Persistence("progress lock poisoned".into()))?;
        *data = Some(snapshot.clone());
        Ok(())
    }
}

/// JSON file store. Writes go to a sibling temp file which is then renamed
/// over the target, so a crash never leaves a half-written progress file.
pub struct FileProgressStore {
    path: PathBuf,
}

impl FileProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ProgressStore for FileProgressStore {
    fn load(&self) -> Result<Option<ProgressSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            AnnotationError::Persistence(format!("read {}: {e}", self.path.display()))
        })?;
        let snapshot = serde_json::from_str(&contents).map_err(|e| {
            AnnotationError::Persistence(format!("parse {}: {e}", self.path.display()))
        })?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &ProgressSnapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, &bytes)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                AnnotationError::Persistence(format!("write {}: {e}", self.path.display()))
            })
    }
}
