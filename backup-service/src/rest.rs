use crate::backup::BackupRunner;
use crate::errors::Error;
use crate::metrics;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

#[derive(Clone)]
struct AppState {
    runner: Arc<BackupRunner>,
}

pub fn create_router(runner: Arc<BackupRunner>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trigger-backup", post(trigger_backup))
        .route("/list-backups", get(list_backups))
        .route("/metrics", get(metrics_handler))
        .with_state(AppState { runner })
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "timestamp": Utc::now()}))
}

async fn trigger_backup(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let outcome = state.runner.run().await?;
    Ok(Json(json!({
        "success": true,
        "filename": outcome.filename,
        "url": outcome.url,
    })))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BackupListing {
    key: String,
    size: i64,
    last_modified: DateTime<Utc>,
}

async fn list_backups(State(state): State<AppState>) -> Result<Json<Vec<BackupListing>>, AppError> {
    let objects = state.runner.list_backups().await?;
    Ok(Json(
        objects
            .into_iter()
            .map(|obj| BackupListing {
                key: obj.key,
                size: obj.size,
                last_modified: obj.last_modified,
            })
            .collect(),
    ))
}

async fn metrics_handler() -> String {
    metrics::gather_metrics()
}

struct AppError(Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("API error: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "error": self.0.to_string()})),
        )
            .into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}
