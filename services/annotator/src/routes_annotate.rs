use annotation::{ProgressStats, ANNOTATION_SAVED, PROGRESS_RESET};
use axum::{extract::State, http::StatusCode, Json};

use crate::state::SharedState;
use crate::types::{
    api_error, from_annotation_error, ActionResponse, AnnotateRequest, AnnotateResponse, ApiError,
    CurrentItemResponse,
};

pub async fn get_current_item(
    State(state): State<SharedState>,
) -> Result<Json<CurrentItemResponse>, ApiError> {
    let (item, stats) = state.run(|wb| wb.get_current()).await?;

    Ok(Json(CurrentItemResponse {
        has_data: item.is_some(),
        item,
        stats,
    }))
}

pub async fn get_stats(State(state): State<SharedState>) -> Result<Json<ProgressStats>, ApiError> {
    let stats = state.run(|wb| wb.stats()).await?;
    Ok(Json(stats))
}

pub async fn post_annotate(
    State(state): State<SharedState>,
    Json(req): Json<AnnotateRequest>,
) -> Result<Json<AnnotateResponse>, ApiError> {
    let Some(value) = req.annotation.as_i64() else {
        return Err(api_error(StatusCode::BAD_REQUEST, "Invalid annotation value"));
    };

    let stats = state
        .run(move |wb| wb.submit_annotation(value))
        .await?
        .map_err(from_annotation_error)?;

    Ok(Json(AnnotateResponse {
        success: true,
        message: ANNOTATION_SAVED.to_string(),
        stats,
    }))
}

pub async fn post_reset(State(state): State<SharedState>) -> Result<Json<ActionResponse>, ApiError> {
    state.run(|wb| wb.reset()).await?;
    Ok(ActionResponse::ok(PROGRESS_RESET))
}
