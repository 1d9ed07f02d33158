//! donki-cme library interface
//!
//! Connector between a reporting host and NASA's DONKI coronal mass ejection
//! API. Exposes public APIs for embedding and integration testing.

pub mod api;
pub mod cme;
pub mod config;
pub mod connector;
pub mod db;
pub mod error;
pub mod services;

pub use crate::connector::{Connector, ConnectorError, ConnectorSettings};
pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub connector: Arc<Connector>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(connector: Connector) -> Self {
        Self {
            connector: Arc::new(connector),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::auth_routes())
        .merge(api::schema_routes())
        .merge(api::data_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
