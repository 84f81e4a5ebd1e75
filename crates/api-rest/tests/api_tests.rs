//! Integration tests for the REST surface.
//!
//! Each test drives the real router over an isolated temp data directory,
//! exercising the same code path as a live server minus the TCP listener.

use api_rest::{create_router, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use depot_core::{CoreConfig, UploadService};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "depot-test-boundary";

fn test_router(temp: &TempDir) -> Router {
    let cfg = Arc::new(CoreConfig::new(temp.path().join("data")));
    let upload_service = UploadService::open(cfg).expect("open upload service");
    create_router(AppState { upload_service })
}

/// Builds a multipart body with optional `position` and `file` parts.
fn multipart_body(filename: Option<&str>, position: Option<&str>, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(position) = position {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"position\"\r\n\r\n{position}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some(filename) = filename {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn post_upload(router: &Router, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn upload_ok(router: &Router, filename: &str, position: &str, content: &[u8]) {
    let (status, body) = post_upload(
        router,
        multipart_body(Some(filename), Some(position), content),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "upload failed: {body}");
}

#[tokio::test]
async fn home_returns_welcome_message() {
    let temp = TempDir::new().unwrap();
    let router = test_router(&temp);

    let (status, body) = get_json(&router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().starts_with("Welcome"));
}

#[tokio::test]
async fn health_reports_ok() {
    let temp = TempDir::new().unwrap();
    let router = test_router(&temp);

    let (status, body) = get_json(&router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
}

#[tokio::test]
async fn upload_then_stats_and_list() {
    let temp = TempDir::new().unwrap();
    let router = test_router(&temp);

    let (status, body) = post_upload(
        &router,
        multipart_body(Some("a.txt"), Some("1"), b"hello"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("File uploaded successfully"));
    assert_eq!(body["filename"], json!("a.txt"));

    let (status, stats) = get_json(&router, "/file-stats/a.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["position"], json!("1"));
    assert!(stats["upload_date"].as_str().unwrap().contains('/'));

    let (status, files) = get_json(&router, "/files").await;
    assert_eq!(status, StatusCode::OK);
    let files = files.as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], json!("a.txt"));
    assert_eq!(files[0]["metadata"]["position"], json!("1"));
}

#[tokio::test]
async fn two_uploads_list_two_records() {
    let temp = TempDir::new().unwrap();
    let router = test_router(&temp);

    upload_ok(&router, "a.txt", "1", b"a").await;
    upload_ok(&router, "b.txt", "2", b"b").await;

    let (_, files) = get_json(&router, "/files").await;
    let files = files.as_array().unwrap();
    assert_eq!(files.len(), 2);

    let (status, stats) = get_json(&router, "/file-stats/a.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["position"], json!("1"));
}

#[tokio::test]
async fn upload_missing_position_is_rejected_without_state_change() {
    let temp = TempDir::new().unwrap();
    let router = test_router(&temp);

    let (status, body) = post_upload(&router, multipart_body(Some("a.txt"), None, b"x")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("File and position are required"));

    let (_, files) = get_json(&router, "/files").await;
    assert_eq!(files.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn upload_missing_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let router = test_router(&temp);

    let (status, body) = post_upload(&router, multipart_body(None, Some("1"), b"")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("File and position are required"));
}

#[tokio::test]
async fn upload_empty_filename_is_rejected() {
    let temp = TempDir::new().unwrap();
    let router = test_router(&temp);

    let (status, body) = post_upload(&router, multipart_body(Some(""), Some("1"), b"x")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("No selected file"));
}

#[tokio::test]
async fn upload_empty_position_is_rejected() {
    let temp = TempDir::new().unwrap();
    let router = test_router(&temp);

    let (status, _) = post_upload(&router, multipart_body(Some("a.txt"), Some(""), b"x")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_traversal_filename_is_rejected() {
    let temp = TempDir::new().unwrap();
    let router = test_router(&temp);

    let (status, body) =
        post_upload(&router, multipart_body(Some("../evil.txt"), Some("1"), b"x")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("separator"));

    let (_, files) = get_json(&router, "/files").await;
    assert_eq!(files.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn reupload_overwrites_metadata_and_content() {
    let temp = TempDir::new().unwrap();
    let router = test_router(&temp);

    upload_ok(&router, "a.txt", "1", b"first").await;
    upload_ok(&router, "a.txt", "9", b"second").await;

    let (_, files) = get_json(&router, "/files").await;
    assert_eq!(files.as_array().unwrap().len(), 1);

    let (_, stats) = get_json(&router, "/file-stats/a.txt").await;
    assert_eq!(stats["position"], json!("9"));

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/download/a.txt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"second");
}

#[tokio::test]
async fn download_serves_bytes_with_headers() {
    let temp = TempDir::new().unwrap();
    let router = test_router(&temp);
    let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    upload_ok(&router, "img.png", "3", &png_header).await;

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/download/img.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "image/png"
    );
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("img.png"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], &png_header[..]);
}

#[tokio::test]
async fn stats_for_unknown_filename_is_404() {
    let temp = TempDir::new().unwrap();
    let router = test_router(&temp);

    let (status, body) = get_json(&router, "/file-stats/missing.txt").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("File not found"));
}

#[tokio::test]
async fn download_of_unknown_filename_is_404() {
    let temp = TempDir::new().unwrap();
    let router = test_router(&temp);

    let (status, body) = get_json(&router, "/download/missing.txt").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("File not found"));
}

#[tokio::test]
async fn uploads_survive_restart() {
    let temp = TempDir::new().unwrap();
    let router = test_router(&temp);
    upload_ok(&router, "a.txt", "1", b"content").await;
    drop(router);

    // A new router over the same data dir reloads the persisted state.
    let router = test_router(&temp);

    let (status, stats) = get_json(&router, "/file-stats/a.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["position"], json!("1"));
}
