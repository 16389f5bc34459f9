use annotation::AnnotationError;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::warn;

use crate::state::SharedState;
use crate::types::{api_error, from_annotation_error, ApiError, ExportResponse};

pub async fn get_export(State(state): State<SharedState>) -> Result<Json<ExportResponse>, ApiError> {
    let summary = state
        .run(|wb| wb.export())
        .await?
        .map_err(from_annotation_error)?;

    if !summary.skipped.is_empty() {
        warn!("Export skipped {:?}", summary.skipped);
    }

    Ok(Json(ExportResponse {
        success: true,
        message: summary.to_string(),
        files: summary.files,
        skipped: summary.skipped,
    }))
}

pub async fn get_download(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let name = filename.clone();
    let bytes = state
        .run(move |wb| wb.retrieve_artifact(&name))
        .await?
        .map_err(|e| match e {
            AnnotationError::NotFound(_) => api_error(StatusCode::NOT_FOUND, "File not found"),
            other => {
                warn!("Error reading artifact {filename}: {other}");
                from_annotation_error(other)
            }
        })?;

    let disposition = format!("attachment; filename=\"{filename}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes_annotate::post_annotate;
    use crate::routes_datasets::post_load_file;
    use crate::state::{test_state, test_state_with};
    use crate::types::{AnnotateRequest, LoadFileRequest};
    use annotation::{ArtifactSink, ExportRow};
    use axum::response::Response;

    struct UnreadableSink;

    impl ArtifactSink for UnreadableSink {
        fn write(&self, _: &str, _: &[ExportRow]) -> annotation::Result<String> {
            Ok("annotated_phrases_news.csv".into())
        }

        fn read(&self, _: &str) -> annotation::Result<Vec<u8>> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        }
    }

    #[tokio::test]
    async fn test_export_without_annotations() {
        let (status, Json(err)) = get_export(State(test_state())).await.unwrap_err();
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(!err.success);
        assert_eq!(err.message, "No annotations to export");
    }

    #[tokio::test]
    async fn test_export_and_download() {
        let state = test_state();
        let Json(loaded) =
            post_load_file(State(state.clone()), Json(LoadFileRequest { filename: "news.csv".into() }))
                .await
                .unwrap();
        assert!(loaded.success);
        let Json(voted) = post_annotate(
            State(state.clone()),
            Json(AnnotateRequest { annotation: serde_json::json!(1) }),
        )
        .await
        .unwrap();
        assert_eq!(voted.stats.completed, 1);

        let Json(resp) = get_export(State(state.clone())).await.unwrap();
        assert!(resp.success);
        assert_eq!(resp.message, "Exported 1 phrase annotation files");
        assert_eq!(resp.files.len(), 1);
        assert!(resp.files[0].starts_with("annotated_phrases_news_"));

        let response: Response = get_download(State(state.clone()), Path(resp.files[0].clone()))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_download_missing() {
        let (status, Json(err)) = get_download(State(test_state()), Path("nope.csv".into()))
            .await
            .map(|_| ())
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!err.success);
        assert_eq!(err.message, "File not found");
    }

    #[tokio::test]
    async fn test_download_read_fault_is_not_404() {
        let state = test_state_with(Box::new(UnreadableSink));
        let (status, Json(err)) =
            get_download(State(state), Path("annotated_phrases_news.csv".into()))
                .await
                .map(|_| ())
                .unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.success);
        assert!(err.message.contains("denied"));
    }
}
