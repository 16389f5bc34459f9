use annotation::{AnnotationError, CurrentItem, ProgressStats};
use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

// Both request fields default so that a missing field reaches the handler
// and is answered with a JSON error body.
#[derive(Deserialize)]
pub struct LoadFileRequest {
    #[serde(default)]
    pub filename: String,
}

#[derive(Deserialize)]
pub struct AnnotateRequest {
    // 1 for yes, 0 for no; anything else is rejected by the session
    #[serde(default)]
    pub annotation: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self { success: true, message: message.into() })
    }
}

#[derive(Debug, Serialize)]
pub struct AnnotateResponse {
    pub success: bool,
    pub message: String,
    pub stats: ProgressStats,
}

#[derive(Debug, Serialize)]
pub struct CurrentItemResponse {
    pub item: Option<CurrentItem>,
    pub stats: ProgressStats,
    pub has_data: bool,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub success: bool,
    pub files: Vec<String>,
    pub skipped: Vec<String>,
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ActionResponse>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ActionResponse { success: false, message: message.into() }))
}

impl From<AnnotationError> for ActionResponse {
    fn from(e: AnnotationError) -> Self {
        ActionResponse { success: false, message: e.to_string() }
    }
}

pub fn status_of(e: &AnnotationError) -> StatusCode {
    match e {
        AnnotationError::NotFound(_) => StatusCode::NOT_FOUND,
        AnnotationError::Validation(_) => StatusCode::BAD_REQUEST,
        AnnotationError::NoData(_) | AnnotationError::Exhausted => StatusCode::CONFLICT,
        AnnotationError::Csv(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AnnotationError::Persistence(_) | AnnotationError::Io(_) | AnnotationError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn from_annotation_error(e: AnnotationError) -> ApiError {
    (status_of(&e), Json(e.into()))
}

pub fn from_join_error(e: tokio::task::JoinError) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("workbench task failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let req: AnnotateRequest = serde_json::from_str("{}").unwrap();
        assert!(req.annotation.is_null());
        let req: LoadFileRequest = serde_json::from_str("{}").unwrap();
        assert!(req.filename.is_empty());
    }
}
