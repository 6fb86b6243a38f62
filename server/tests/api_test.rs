//! Integration tests for the readings HTTP surface, driven through the
//! router with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use bp_server::{rest, store};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

async fn test_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = store::spawn_store(dir.path().join("bp_readings.json"))
        .await
        .unwrap();
    (rest::create_router(store), dir)
}

async fn request_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn post_without_id_generates_one_and_record_shows_in_list() {
    let (app, _dir) = test_app().await;

    let response = request_json(
        &app,
        Method::POST,
        "/api/readings",
        Some(json!({"systolic": 120, "diastolic": 80, "pulse": 70, "notes": "ok"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap();
    assert!(!id.is_empty());

    let response = request_json(&app, Method::GET, "/api/readings", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let listed = body_json(response).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], id);
    assert_eq!(listed[0]["notes"], "ok");
}

#[tokio::test]
async fn update_of_unknown_id_returns_404() {
    let (app, _dir) = test_app().await;

    let response = request_json(
        &app,
        Method::PUT,
        "/api/readings/ghost",
        Some(json!({"systolic": 125})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Reading not found");
}

#[tokio::test]
async fn update_merges_partial_fields() {
    let (app, _dir) = test_app().await;

    let response = request_json(
        &app,
        Method::POST,
        "/api/readings",
        Some(json!({"id": "r1", "systolic": 120, "diastolic": 80, "pulse": 70})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = request_json(
        &app,
        Method::PUT,
        "/api/readings/r1",
        Some(json!({"notes": "evening"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert_eq!(updated["systolic"], 120);
    assert_eq!(updated["notes"], "evening");
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (app, _dir) = test_app().await;

    for _ in 0..2 {
        let response = request_json(&app, Method::DELETE, "/api/readings/ghost", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Reading deleted successfully");
    }
}

#[tokio::test]
async fn import_rejects_non_array_payload() {
    let (app, _dir) = test_app().await;

    let response = request_json(
        &app,
        Method::POST,
        "/api/readings",
        Some(json!({"id": "keep", "systolic": 120, "diastolic": 80, "pulse": 70})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = request_json(
        &app,
        Method::POST,
        "/api/import",
        Some(json!({"not": "an array"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The existing collection is untouched.
    let response = request_json(&app, Method::GET, "/api/readings", None).await;
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn import_replaces_the_whole_collection() {
    let (app, _dir) = test_app().await;

    let response = request_json(
        &app,
        Method::POST,
        "/api/readings",
        Some(json!({"id": "old", "systolic": 120, "diastolic": 80, "pulse": 70})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let snapshot = json!([
        {"id": "n1", "timestamp": "2024-01-01T08:00", "systolic": 118, "diastolic": 78, "pulse": 66, "notes": ""},
        {"id": "n2", "timestamp": "2024-01-02T08:00", "systolic": 122, "diastolic": 82, "pulse": 68, "notes": ""}
    ]);
    let response = request_json(&app, Method::POST, "/api/import", Some(snapshot)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = request_json(&app, Method::GET, "/api/readings", None).await;
    let listed = body_json(response).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["id"], "n1");
    assert_eq!(listed[1]["id"], "n2");
}

#[tokio::test]
async fn backup_download_is_an_attachment() {
    let (app, _dir) = test_app().await;

    let response = request_json(&app, Method::GET, "/api/backup", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment; filename=bp_readings_backup_"));

    let body = body_json(response).await;
    assert!(body.is_array());
}

#[tokio::test]
async fn health_returns_healthy() {
    let (app, _dir) = test_app().await;

    let response = request_json(&app, Method::GET, "/api/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}
