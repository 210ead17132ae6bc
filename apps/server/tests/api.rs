use std::collections::HashMap;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use budgetbook_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

async fn build_test_router() -> (TempDir, Router) {
    let tmp = tempfile::tempdir().unwrap();
    let vars: HashMap<&str, String> = HashMap::from([
        (
            "BB_DB_PATH",
            tmp.path().join("db/test.db").display().to_string(),
        ),
        ("BB_DRIVE_DIR", tmp.path().join("drive").display().to_string()),
    ]);
    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();
    let state = build_state(&config).await.unwrap();
    (tmp, app_router(state, &config))
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn post_event(app: &Router, event: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/settings/events")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(event.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Polls the state endpoint until `predicate` holds.
async fn wait_for_state(app: &Router, predicate: impl Fn(&Value) -> bool) -> Value {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let (_, state) = get_json(app, "/api/v1/settings/state").await;
            if predicate(&state) {
                return state;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("settings state did not converge")
}

#[tokio::test]
async fn healthz_returns_ok() {
    let (_tmp, app) = build_test_router().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn initial_state_has_defaults() {
    let (_tmp, app) = build_test_router().await;
    let (status, state) = get_json(&app, "/api/v1/settings/state").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        state,
        json!({
            "baseCurrency": "USD",
            "startDayOfMonth": 1,
            "hideBalance": false,
            "appLocked": false,
            "driveMounted": false,
            "importOldData": { "status": "idle" }
        })
    );
}

#[tokio::test]
async fn preference_events_update_the_state() {
    let (_tmp, app) = build_test_router().await;

    let (status, _) = post_event(
        &app,
        json!({ "type": "startDayOfMonth", "startDayOfMonth": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = post_event(
        &app,
        json!({ "type": "baseCurrencyChange", "newCurrency": "eur" }),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let state = wait_for_state(&app, |s| {
        s["startDayOfMonth"] == 5 && s["baseCurrency"] == "EUR"
    })
    .await;
    assert_eq!(state["hideBalance"], false);
}

#[tokio::test]
async fn out_of_range_start_day_is_bad_request() {
    let (_tmp, app) = build_test_router().await;

    let (status, body) = post_event(
        &app,
        json!({ "type": "startDayOfMonth", "startDayOfMonth": 29 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    let (_, state) = get_json(&app, "/api/v1/settings/state").await;
    assert_eq!(state["startDayOfMonth"], 1);
}

#[tokio::test]
async fn mount_drive_marks_drive_mounted() {
    let (tmp, app) = build_test_router().await;

    let (status, _) = post_event(&app, json!({ "type": "mountDrive" })).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    wait_for_state(&app, |s| s["driveMounted"] == true).await;
    assert!(tmp.path().join("drive").is_dir());
}

#[tokio::test]
async fn transactions_start_empty() {
    let (_tmp, app) = build_test_router().await;
    let (status, body) = get_json(&app, "/api/v1/transactions?accountId=abc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
