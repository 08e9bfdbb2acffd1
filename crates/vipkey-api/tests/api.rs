//! Route tests for vipkey-api.
//!
//! Requests go straight to the router through `tower::ServiceExt` without
//! binding a TCP socket.

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use vipkey_api::app::build_app;
use vipkey_api::state::AppState;

fn temp_path() -> PathBuf {
    std::env::temp_dir().join(format!("vipkey-api-{}.json", uuid::Uuid::new_v4()))
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_returns_ok() {
    let app = build_app(AppState::new(temp_path()));
    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn auth_config_reports_summary() {
    let path = temp_path();
    std::fs::write(
        &path,
        r#"{
            "owner_email": "owner@example.com",
            "authorized_emails": ["staff@example.com"],
            "password_access": { "guest@example.com": "s3cret-pass" }
        }"#,
    )
    .unwrap();

    let (status, body) = get_json(build_app(AppState::new(&path)), "/debug/auth-config").await;
    std::fs::remove_file(&path).ok();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let ts = body["timestamp"].as_str().unwrap();
    assert!(chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").is_ok(), "{}", ts);

    let cfg = &body["auth_config"];
    assert_eq!(cfg["owner_email"], "owner@example.com");
    assert_eq!(cfg["authorized_emails"][0], "staff@example.com");
    assert_eq!(cfg["has_password_access"], true);
    assert_eq!(cfg["password_emails"][0], "guest@example.com");
    assert_eq!(cfg["file_exists"], true);
    assert_eq!(cfg["file_path"], path.display().to_string());

    assert!(!body.to_string().contains("s3cret-pass"));
}

#[tokio::test]
async fn auth_config_without_file_is_still_ok() {
    let path = temp_path();
    let (status, body) = get_json(build_app(AppState::new(&path)), "/debug/auth-config").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let cfg = &body["auth_config"];
    assert_eq!(cfg["file_exists"], false);
    assert!(cfg["owner_email"].is_null());
    assert_eq!(cfg["authorized_emails"].as_array().unwrap().len(), 0);
    assert_eq!(cfg["has_password_access"], false);
    assert_eq!(cfg["password_emails"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn auth_config_is_read_on_every_request() {
    let path = temp_path();
    let app = build_app(AppState::new(&path));

    let (_, before) = get_json(app.clone(), "/debug/auth-config").await;
    assert_eq!(before["auth_config"]["file_exists"], false);

    std::fs::write(&path, r#"{ "owner_email": "late@example.com" }"#).unwrap();
    let (_, after) = get_json(app, "/debug/auth-config").await;
    std::fs::remove_file(&path).ok();

    assert_eq!(after["auth_config"]["file_exists"], true);
    assert_eq!(after["auth_config"]["owner_email"], "late@example.com");
}

#[tokio::test]
async fn auth_config_rejects_post() {
    let app = build_app(AppState::new(temp_path()));
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/debug/auth-config")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn concurrent_auth_config_requests_all_complete() {
    let path = temp_path();
    std::fs::write(&path, r#"{ "authorized_emails": ["a@example.com", "b@example.com"] }"#)
        .unwrap();
    let app = build_app(AppState::new(&path));

    let (first, second, third) = tokio::join!(
        get_json(app.clone(), "/debug/auth-config"),
        get_json(app.clone(), "/debug/auth-config"),
        get_json(app, "/debug/auth-config"),
    );
    std::fs::remove_file(&path).ok();

    for (status, body) in [first, second, third] {
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["auth_config"]["authorized_emails"],
            serde_json::json!(["a@example.com", "b@example.com"])
        );
    }
}
