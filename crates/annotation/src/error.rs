use thiserror::Error;

/// Failures surfaced by the session and its collaborators.
///
/// Display strings are user-facing; the presentation layer shows them as-is.
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NoData(String),

    #[error("No more phrases to annotate")]
    Exhausted,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnnotationError>;
