//! Shared test helpers: stub fetcher, in-memory database, sample payloads

#![allow(dead_code)]

use async_trait::async_trait;
use donki_cme::services::{
    CredentialStore, FetchError, FetchResponse, Fetcher, MemoryCredentialStore,
};
use donki_cme::{Connector, ConnectorSettings};
use donki_common::Credential;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::{Arc, Mutex};

pub const TEST_ENDPOINT: &str = "https://donki.test/CME";

/// Fetcher returning a canned outcome and recording requested URLs
pub struct StubFetcher {
    outcome: Result<FetchResponse, String>,
    urls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    pub fn json(value: Value) -> Self {
        Self::ok(value.to_string())
    }

    pub fn status(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            outcome: Ok(FetchResponse {
                status_code,
                body: body.into(),
            }),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.urls.lock().unwrap().push(url.to_string());
        self.outcome
            .clone()
            .map_err(FetchError::Network)
    }
}

/// In-memory SQLite pool with the settings table
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    donki_common::db::init::create_settings_table(&pool)
        .await
        .unwrap();
    pool
}

pub fn settings() -> ConnectorSettings {
    ConnectorSettings {
        endpoint: TEST_ENDPOINT.to_string(),
        admin_mode: false,
    }
}

/// Connector over a memory store and the given fetcher
pub fn connector_with(
    credential: Option<Credential>,
    fetcher: Arc<StubFetcher>,
) -> (Connector, Arc<MemoryCredentialStore>) {
    let store = Arc::new(match credential {
        Some(credential) => MemoryCredentialStore::with_credential(credential),
        None => MemoryCredentialStore::new(),
    });
    let store_dyn: Arc<dyn CredentialStore> = store.clone();
    (Connector::new(store_dyn, fetcher, settings()), store)
}

/// The single-event payload used across tests
pub fn single_event(analyses: Value) -> Value {
    json!([{
        "activityID": "A1",
        "startTime": "2023-03-01T00:00:00Z",
        "cmeAnalyses": analyses
    }])
}

/// A realistic multi-event DONKI page
pub fn donki_page() -> Value {
    json!([
        {
            "activityID": "2023-03-01T05:00:00-CME-001",
            "catalog": "M2M_CATALOG",
            "startTime": "2023-03-01T05:00Z",
            "sourceLocation": "N20W30",
            "activeRegionNum": 13234,
            "note": "Faint CME",
            "instruments": [{ "displayName": "SOHO: LASCO/C2" }],
            "cmeAnalyses": [
                { "isMostAccurate": false, "speed": 450, "type": "S", "time21_5": "2023-03-01T12:00Z" },
                { "isMostAccurate": true, "speed": 612, "type": "C", "time21_5": "2023-03-01T11:48Z",
                  "latitude": 15.0, "longitude": -40.5, "halfAngle": 32.0, "levelOfData": 1 }
            ]
        },
        {
            "activityID": "2023-03-02T10:12:00-CME-001",
            "catalog": "M2M_CATALOG",
            "startTime": "2023-03-02T10:12Z",
            "sourceLocation": "",
            "activeRegionNum": null,
            "note": "",
            "cmeAnalyses": null
        },
        {
            "activityID": "2023-03-03T22:36:00-CME-001",
            "catalog": "M2M_CATALOG",
            "startTime": "2023-03-03T22:36Z",
            "cmeAnalyses": [
                { "isMostAccurate": false, "speed": 1200, "type": "O", "time21_5": "2023-03-04T02:15Z" }
            ]
        }
    ])
}
