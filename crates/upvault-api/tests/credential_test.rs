//! Credential endpoint integration tests.
//!
//! Run with: `cargo test -p upvault-api --test credential_test`

mod helpers;

use helpers::{api_path, setup_test_app};
use serde_json::{json, Value};

#[tokio::test]
async fn test_issue_credential() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/credential"))
        .json(&json!({ "fileName": "cat.png", "contentType": "image/png", "size": 1024 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let key = body["key"].as_str().unwrap();
    let url = body["presignedUrl"].as_str().unwrap();

    assert!(key.ends_with("-cat.png"));
    assert!(url.starts_with("http://localhost:4000/store/"));
    assert!(url.contains("signature="));
    assert!(body["expiresAt"].as_str().is_some());
    // No object is created when a credential is issued
    assert!(!app.object_exists(key));
}

#[tokio::test]
async fn test_identical_requests_get_distinct_keys() {
    let app = setup_test_app().await;
    let request = json!({ "fileName": "same.png", "contentType": "image/png", "size": 1 });

    let first: Value = app.client().post(&api_path("/credential")).json(&request).await.json();
    let second: Value = app.client().post(&api_path("/credential")).json(&request).await.json();

    assert_ne!(first["key"], second["key"]);
}

#[tokio::test]
async fn test_missing_content_type_is_bad_request() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/credential"))
        .json(&json!({ "fileName": "cat.png", "size": 10 }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(body["recoverable"], false);
}

#[tokio::test]
async fn test_negative_size_is_bad_request() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/credential"))
        .json(&json!({ "fileName": "cat.png", "contentType": "image/png", "size": -5 }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/credential"))
        .add_header("X-Request-ID", "req-123")
        .json(&json!({ "fileName": "cat.png", "contentType": "image/png", "size": 1 }))
        .await;

    assert_eq!(response.header("X-Request-ID"), "req-123");
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = setup_test_app().await;

    app.client().get("/health").await.assert_status_ok();

    let spec: Value = app.client().get("/api/openapi.json").await.json();
    assert!(spec["paths"]["/api/v0/credential"].is_object());
}
