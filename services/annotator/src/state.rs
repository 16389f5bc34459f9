use std::sync::Arc;
use tokio::sync::RwLock;

use annotation::{CsvDirectory, FileProgressStore, ResultsDir, Session, Workbench};

use crate::config::AppConfig;
use crate::types::{from_join_error, ApiError};

pub type SharedState = Arc<AppState>;

/// One workbench per process; the lock serializes every command.
#[derive(Clone)]
pub struct AppState {
    pub workbench: Arc<RwLock<Workbench>>,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        let session = Session::open(Box::new(FileProgressStore::new(&cfg.progress_file)));
        Self::from_workbench(Workbench::new(
            session,
            Box::new(CsvDirectory::new(&cfg.data_dir)),
            Box::new(ResultsDir::new(&cfg.results_dir)),
        ))
    }

    pub fn from_workbench(workbench: Workbench) -> Self {
        Self {
            workbench: Arc::new(RwLock::new(workbench)),
        }
    }

    /// Run one workbench command on the blocking pool; every command may
    /// touch the filesystem.
    pub async fn run<R, F>(&self, f: F) -> Result<R, ApiError>
    where
        R: Send + 'static,
        F: FnOnce(&mut Workbench) -> R + Send + 'static,
    {
        let workbench = self.workbench.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = workbench.blocking_write();
            f(&mut *guard)
        })
        .await
        .map_err(from_join_error)
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> SharedState {
    test_state_with(Box::new(annotation::InMemoryArtifacts::new()))
}

#[cfg(test)]
pub(crate) fn test_state_with(artifacts: Box<dyn annotation::ArtifactSink>) -> SharedState {
    use annotation::{Article, InMemoryDatasets, InMemoryProgressStore};

    let datasets = InMemoryDatasets::new().with(
        "news.csv",
        vec![Article {
            row: 0,
            content: "Le musée rouvre ses portes. Les visiteurs affluent dès le matin.".into(),
            headline: "Réouverture".into(),
            ..Default::default()
        }],
    );
    Arc::new(AppState::from_workbench(Workbench::new(
        Session::open(Box::new(InMemoryProgressStore::new())),
        Box::new(datasets),
        artifacts,
    )))
}
