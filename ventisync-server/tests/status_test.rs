use std::time::Duration;

use axum::body::BodyDataStream;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use serde_json::json;
use time::OffsetDateTime;
use tokio::time::timeout;
use tokio_stream::StreamExt;

use crate::common::mock_app::{DEFAULT_CONFIG, MockApp, StaticProvider};

mod common;

#[tokio::test]
async fn test_initial_status() {
    let app = MockApp::new();

    let (status, body) = app.get("/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isOpen"], json!(false));
    assert_eq!(body["autoMode"], json!(true));
    assert_eq!(body["mode"], json!("AUTO"));
    assert_eq!(body["reportedOpen"], json!(null));
    assert_eq!(body["deviceOnline"], json!(false));
}

#[tokio::test]
async fn test_environment_unavailable_before_refresh() {
    let app = MockApp::with_provider(StaticProvider::offline());
    app.context.scheduler.refresh_all(OffsetDateTime::now_utc()).await;

    let (status, body) = app.get("/api/environment").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], json!(503));
}

#[tokio::test]
async fn test_environment_after_refresh() {
    let app = MockApp::with_provider(StaticProvider::polluted());
    app.context.scheduler.refresh_all(OffsetDateTime::now_utc()).await;

    let (status, body) = app.get("/api/environment").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fresh"], json!(true));
    assert_eq!(body["reading"]["europeanAqi"], json!(80));
    assert_eq!(body["recommendation"], json!(false));
    assert_eq!(body["location"]["latitude"], json!(45.18));
}

#[tokio::test]
async fn test_environment_lists_every_location() {
    let config =
        format!("{DEFAULT_CONFIG}\n[[location.extra]]\nlatitude = 48.85\nlongitude = 2.35\n");
    let app = MockApp::with_config(&config, StaticProvider::sunny());

    let (_, body) = app.get("/api/environment/all").await;
    assert_eq!(body, json!([]));

    assert_eq!(app.context.scheduler.refresh_all(OffsetDateTime::now_utc()).await, 2);

    let (status, body) = app.get("/api/environment/all").await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["location"]["latitude"], json!(45.18));
    assert_eq!(entries[1]["location"]["latitude"], json!(48.85));
    assert_eq!(entries[1]["location"]["longitude"], json!(2.35));
    assert_eq!(entries[1]["fresh"], json!(true));
    assert_eq!(entries[1]["recommendation"], json!(true));
}

/// Reads the event stream until `needle` shows up, returning everything read.
async fn read_until(stream: &mut BodyDataStream, needle: &str) -> String {
    let mut received = String::new();

    timeout(Duration::from_secs(5), async {
        while let Some(chunk) = stream.next().await {
            received.push_str(&String::from_utf8_lossy(&chunk.unwrap()));
            if received.contains(needle) {
                break;
            }
        }
    })
    .await
    .unwrap();

    received
}

#[tokio::test]
async fn test_status_events_follow_control() {
    let app = MockApp::new();

    let response = app.open("/api/status/events").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );

    let mut stream = response.into_body().into_data_stream();
    let initial = read_until(&mut stream, "\"mode\":\"AUTO\"").await;
    assert!(initial.contains("event: status"));

    let (status, _) = app.post("/api/control", json!({ "action": "open" })).await;
    assert_eq!(status, StatusCode::OK);

    let update = read_until(&mut stream, "\"mode\":\"FORCE_OPEN\"").await;
    assert!(update.contains("event: status"));
    assert!(update.contains("\"isOpen\":true"));
}

#[tokio::test]
async fn test_openapi_document() {
    let app = MockApp::new();

    let (status, body) = app.get("/api/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/control"].is_object());
    assert!(body["paths"]["/api/device/telemetry"].is_object());
    assert!(body["paths"]["/api/environment/all"].is_object());
}
