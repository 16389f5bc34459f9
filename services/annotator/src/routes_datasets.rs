use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::state::SharedState;
use crate::types::{api_error, from_annotation_error, ActionResponse, ApiError, LoadFileRequest};

pub async fn get_files(State(state): State<SharedState>) -> Result<Json<Vec<String>>, ApiError> {
    let files = state
        .run(|wb| wb.list_available_datasets())
        .await?
        .map_err(from_annotation_error)?;

    Ok(Json(files))
}

pub async fn post_load_file(
    State(state): State<SharedState>,
    Json(req): Json<LoadFileRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let filename = req.filename;
    if filename.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "No filename provided"));
    }

    let summary = state
        .run(move |wb| wb.load_dataset(&filename))
        .await?
        .map_err(from_annotation_error)?;

    info!("{summary}");
    Ok(ActionResponse::ok(summary.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    #[tokio::test]
    async fn test_list_and_load() {
        let state = test_state();
        let Json(files) = get_files(State(state.clone())).await.unwrap();
        assert_eq!(files, vec!["news.csv"]);

        let Json(resp) = post_load_file(
            State(state.clone()),
            Json(LoadFileRequest { filename: "news.csv".into() }),
        )
        .await
        .unwrap();
        assert!(resp.success);
        assert_eq!(resp.message, "Loaded and shuffled 1 articles with 2 phrases from news.csv");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let state = test_state();
        let (status, Json(resp)) = post_load_file(
            State(state),
            Json(LoadFileRequest { filename: "absent.csv".into() }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!resp.success);
        assert_eq!(resp.message, "File absent.csv not found");
    }

    #[tokio::test]
    async fn test_load_without_filename() {
        let (status, Json(resp)) =
            post_load_file(State(test_state()), Json(LoadFileRequest { filename: String::new() }))
                .await
                .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.message, "No filename provided");
    }
}
