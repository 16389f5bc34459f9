mod config;
mod state;
mod types;
pub mod routes_annotate;
pub mod routes_datasets;
pub mod routes_export;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::state::{AppState, SharedState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = AppConfig::from_env()?;
    info!(
        "data: {}, progress: {}, results: {}",
        cfg.data_dir.display(),
        cfg.progress_file.display(),
        cfg.results_dir.display()
    );

    let app_state = Arc::new(AppState::new(&cfg));
    match app_state.workbench.read().await.list_available_datasets() {
        Ok(files) => info!("Available CSV files: {files:?}"),
        Err(e) => warn!("Error listing CSV files: {e}"),
    }

    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.bind_addr))?;
    info!("annotator listening on http://{}", cfg.bind_addr);
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/files", get(routes_datasets::get_files))
        .route("/api/load_file", post(routes_datasets::post_load_file))
        .route("/api/current_item", get(routes_annotate::get_current_item))
        .route("/api/stats", get(routes_annotate::get_stats))
        .route("/api/annotate", post(routes_annotate::post_annotate))
        .route("/api/reset", post(routes_annotate::post_reset))
        .route("/api/export", get(routes_export::get_export))
        .route("/download/:filename", get(routes_export::get_download))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: &str) -> (StatusCode, String, serde_json::Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router(test_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_annotate_without_field_answers_json() {
        let (status, content_type, body) = post_json("/api/annotate", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type, "application/json");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid annotation value");
    }

    #[tokio::test]
    async fn test_load_without_field_answers_json() {
        let (status, content_type, body) = post_json("/api/load_file", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type, "application/json");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "No filename provided");
    }

    #[tokio::test]
    async fn test_load_through_router() {
        let (status, _, body) = post_json("/api/load_file", r#"{"filename":"news.csv"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }
}
