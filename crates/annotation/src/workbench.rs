use crate::{
    ArtifactSink, CurrentItem, DatasetSource, ExportSummary, LoadSummary, ProgressStats, Result,
    Session,
};

pub const ANNOTATION_SAVED: &str = "Phrase annotation saved";
pub const PROGRESS_RESET: &str = "Progress reset";

/// The command surface offered to the presentation layer.
///
/// Ties the session to where datasets come from and where exports go.
pub struct Workbench {
    session: Session,
    datasets: Box<dyn DatasetSource>,
    artifacts: Box<dyn ArtifactSink>,
}

impl Workbench {
    pub fn new(
        session: Session,
        datasets: Box<dyn DatasetSource>,
        artifacts: Box<dyn ArtifactSink>,
    ) -> Self {
        Self { session, datasets, artifacts }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn list_available_datasets(&self) -> Result<Vec<String>> {
        self.datasets.list()
    }

    /// Session state is only replaced once the dataset has been read in full.
    pub fn load_dataset(&mut self, name: &str) -> Result<LoadSummary> {
        let articles = self.datasets.read(name)?;
        Ok(self.session.load(name, articles))
    }

    pub fn get_current(&self) -> (Option<CurrentItem>, ProgressStats) {
        (self.session.current(), self.session.stats())
    }

    pub fn stats(&self) -> ProgressStats {
        self.session.stats()
    }

    pub fn submit_annotation(&mut self, value: i64) -> Result<ProgressStats> {
        self.session.annotate(value)?;
        Ok(self.session.stats())
    }

    pub fn export(&self) -> Result<ExportSummary> {
        self.session.export(self.artifacts.as_ref())
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn retrieve_artifact(&self, name: &str) -> Result<Vec<u8>> {
        self.artifacts.read(name)
    }
}
