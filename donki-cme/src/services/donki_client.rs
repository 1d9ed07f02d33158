//! DONKI API client
//!
//! Performs the single upstream HTTP call per request. Nothing here retries:
//! transport failures surface to the caller unchanged.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("donki-cme/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fetcher errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Raw upstream response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status_code: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }
}

/// Performs an HTTP GET for a fully built URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// reqwest-backed fetcher
pub struct HttpFetcher {
    http_client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        tracing::debug!(url = %mask_url(url), "Fetching from DONKI");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        tracing::debug!(status_code, body_len = body.len(), "DONKI response received");

        Ok(FetchResponse { status_code, body })
    }
}

/// URL used to check that a key is accepted
pub fn build_auth_check_url(endpoint: &str, api_key: &str) -> String {
    format!("{}?api_key={}", endpoint, api_key)
}

/// URL for events between `start` and `end` (inclusive, `YYYY-MM-DD`)
pub fn build_data_url(endpoint: &str, api_key: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{}&startDate={}&endDate={}",
        build_auth_check_url(endpoint, api_key),
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    )
}

/// Copy of `url` with the `api_key` value replaced by the mask, for logging
pub fn mask_url(url: &str) -> String {
    let Some(start) = url.find("api_key=").map(|i| i + "api_key=".len()) else {
        return url.to_string();
    };
    let end = url[start..].find('&').map(|i| start + i).unwrap_or(url.len());

    format!("{}{}{}", &url[..start], donki_common::credentials::MASK, &url[end..])
}
