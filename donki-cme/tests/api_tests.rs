//! Integration tests for the HTTP API
//!
//! Requests go through the full router with `tower::ServiceExt::oneshot`.

mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use donki_cme::services::{CredentialStore, SettingsCredentialStore};
use donki_cme::{build_router, AppState, Connector};
use donki_common::Credential;
use helpers::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn app_with_db(fetcher: Arc<StubFetcher>) -> (Router, Arc<SettingsCredentialStore>) {
    let store = Arc::new(SettingsCredentialStore::new(setup_test_db().await));
    let connector = Connector::new(store.clone(), fetcher, settings());
    (build_router(AppState::new(connector)), store)
}

fn data_body(fields: &[&str]) -> Value {
    json!({
        "fields": fields.iter().map(|n| json!({ "name": n })).collect::<Vec<_>>(),
        "dateRange": { "startDate": "2023-03-01", "endDate": "2023-03-31" }
    })
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app_with_db(Arc::new(StubFetcher::ok(""))).await;

    let (status, body) = send(app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "donki-cme");
}

#[tokio::test]
async fn test_auth_type() {
    let (app, _) = app_with_db(Arc::new(StubFetcher::ok(""))).await;

    let (status, body) = send(app, "GET", "/auth/type", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "type": "KEY" }));
}

#[tokio::test]
async fn test_set_then_view_masked_credentials() {
    let (app, store) = app_with_db(Arc::new(StubFetcher::ok(""))).await;

    let (status, body) = send(
        app.clone(),
        "POST",
        "/auth/credentials",
        Some(json!({ "key": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "errorCode": "NONE" }));

    let (status, body) = send(app, "GET", "/auth/credentials", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "credentials": { "key": "****" } }));
    assert!(!body.to_string().contains("secret123"));

    assert_eq!(
        store.get().await.unwrap(),
        Some(Credential::api_key("secret123"))
    );
}

#[tokio::test]
async fn test_set_user_pass_credentials_masked() {
    let (app, _) = app_with_db(Arc::new(StubFetcher::ok(""))).await;

    send(
        app.clone(),
        "POST",
        "/auth/credentials",
        Some(json!({ "userPass": { "username": "alice", "password": "hunter2" } })),
    )
    .await;

    let (_, body) = send(app, "GET", "/auth/credentials", None).await;
    assert_eq!(
        body,
        json!({ "credentials": { "userPass": { "username": "****", "password": "****" } } })
    );
}

#[tokio::test]
async fn test_set_username_without_password() {
    let (app, store) = app_with_db(Arc::new(StubFetcher::ok(""))).await;

    let (status, body) = send(
        app,
        "POST",
        "/auth/credentials",
        Some(json!({ "userPass": { "username": "alice" } })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "errorCode": "NONE" }));
    assert_eq!(
        store.get().await.unwrap(),
        Some(Credential::user_password("alice", ""))
    );
}

#[tokio::test]
async fn test_set_empty_credentials_reports_invalid() {
    let (app, store) = app_with_db(Arc::new(StubFetcher::ok(""))).await;

    let (status, body) = send(app, "POST", "/auth/credentials", Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "errorCode": "INVALID_CREDENTIALS" }));
    assert_eq!(store.get().await.unwrap(), None);
}

#[tokio::test]
async fn test_reset_auth() {
    let (app, store) = app_with_db(Arc::new(StubFetcher::ok(""))).await;
    store.set(Credential::api_key("secret123")).await.unwrap();

    let (status, body) = send(app.clone(), "DELETE", "/auth/credentials", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (_, body) = send(app, "GET", "/auth/credentials", None).await;
    assert_eq!(body, json!({ "credentials": null }));
}

#[tokio::test]
async fn test_auth_valid() {
    let (app, store) = app_with_db(Arc::new(StubFetcher::ok("[]"))).await;

    let (_, body) = send(app.clone(), "GET", "/auth/valid", None).await;
    assert_eq!(body, json!({ "valid": false }));

    store.set(Credential::api_key("KEY")).await.unwrap();
    let (_, body) = send(app, "GET", "/auth/valid", None).await;
    assert_eq!(body, json!({ "valid": true }));
}

#[tokio::test]
async fn test_config_and_admin() {
    let (app, _) = app_with_db(Arc::new(StubFetcher::ok(""))).await;

    let (_, config) = send(app.clone(), "GET", "/config", None).await;
    assert_eq!(config["dateRangeRequired"], true);

    let (_, admin) = send(app, "GET", "/admin", None).await;
    assert_eq!(admin, json!({ "isAdminUser": false }));
}

#[tokio::test]
async fn test_schema_full_and_narrowed() {
    let (app, _) = app_with_db(Arc::new(StubFetcher::ok(""))).await;

    let (status, full) = send(app.clone(), "POST", "/schema", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(full["schema"].as_array().unwrap().len(), 13);
    assert_eq!(
        full["schema"][1],
        json!({
            "name": "startTime",
            "label": "Start Time",
            "dataType": "STRING",
            "semantics": { "conceptType": "DIMENSION", "semanticType": "YEAR_MONTH_DAY_HOUR" }
        })
    );

    let (_, narrowed) = send(
        app,
        "POST",
        "/schema",
        Some(json!({ "fields": [{ "name": "cmeAnalysisSpeed" }, { "name": "nope" }] })),
    )
    .await;
    assert_eq!(narrowed["schema"].as_array().unwrap().len(), 1);
    assert_eq!(narrowed["schema"][0]["defaultAggregationType"], "AVG");
}

#[tokio::test]
async fn test_data_end_to_end() {
    let fetcher = Arc::new(StubFetcher::json(single_event(json!([{
        "isMostAccurate": true,
        "speed": 500,
        "time21_5": "2023-03-01T05:00:00Z"
    }]))));
    let (app, store) = app_with_db(fetcher).await;
    store.set(Credential::api_key("KEY")).await.unwrap();

    let (status, body) = send(
        app,
        "POST",
        "/data",
        Some(data_body(&["activityID", "cmeAnalysisSpeed"])),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"], json!([{ "values": ["A1", 500] }]));
    assert_eq!(body["schema"][0]["name"], "activityID");
    assert_eq!(body["schema"][1]["name"], "cmeAnalysisSpeed");
    assert_eq!(body["cachedData"], false);
}

#[tokio::test]
async fn test_data_unknown_field_is_bad_request() {
    let (app, store) = app_with_db(Arc::new(StubFetcher::json(donki_page()))).await;
    store.set(Credential::api_key("KEY")).await.unwrap();

    let (status, body) = send(app, "POST", "/data", Some(data_body(&["bogus"]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_data_upstream_failure_is_bad_gateway() {
    let (app, store) = app_with_db(Arc::new(StubFetcher::status(500, "oops"))).await;
    store.set(Credential::api_key("KEY")).await.unwrap();

    let (status, body) = send(app, "POST", "/data", Some(data_body(&["activityID"]))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn test_data_rejects_malformed_date_range() {
    let (app, _) = app_with_db(Arc::new(StubFetcher::ok(""))).await;

    let (status, _) = send(
        app,
        "POST",
        "/data",
        Some(json!({
            "fields": [{ "name": "activityID" }],
            "dateRange": { "startDate": "March 1st", "endDate": "2023-03-31" }
        })),
    )
    .await;

    assert!(status.is_client_error());
}
