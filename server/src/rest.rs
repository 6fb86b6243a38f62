use crate::errors::Error;
use crate::model::{NewReading, Reading, ReadingPatch};
use crate::store::StoreHandle;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

#[derive(Clone)]
struct AppState {
    store: StoreHandle,
}

pub fn create_router(store: StoreHandle) -> Router {
    let state = AppState { store };

    Router::new()
        .route("/api/readings", get(list_readings).post(create_reading))
        .route("/api/readings/:id", put(update_reading).delete(delete_reading))
        .route("/api/backup", get(download_backup))
        .route("/api/import", post(import_readings))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn list_readings(State(state): State<AppState>) -> Result<Json<Vec<Reading>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

async fn create_reading(
    State(state): State<AppState>,
    Json(new): Json<NewReading>,
) -> Result<(StatusCode, Json<Reading>), ApiError> {
    let created = state.store.create(new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_reading(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ReadingPatch>,
) -> Result<Json<Reading>, ApiError> {
    Ok(Json(state.store.update(&id, patch).await?))
}

async fn delete_reading(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete(&id).await?;
    Ok(Json(json!({"message": "Reading deleted successfully"})))
}

/// Serves the raw persisted document as a download.
async fn download_backup(State(state): State<AppState>) -> Result<Response, ApiError> {
    let raw = state.store.export().await?;
    let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S");
    let headers = [
        (header::CONTENT_TYPE, "application/json".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=bp_readings_backup_{timestamp}.json"),
        ),
    ];
    Ok((headers, raw).into_response())
}

async fn import_readings(
    State(state): State<AppState>,
    Json(records): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let count = state.store.import(records).await?;
    info!("Imported {} readings", count);
    Ok(Json(json!({"message": "Data imported successfully"})))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}

struct ApiError(Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            Error::NotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Reading not found"}),
            ),
            Error::Validation(message) => {
                (StatusCode::BAD_REQUEST, json!({"error": message}))
            }
            other => {
                error!("API error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": other.to_string()}),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}
