//! Schema and configuration endpoints

use axum::{extract::State, routing::{get, post}, Json, Router};
use serde::Serialize;

use crate::connector::{ConfigResponse, SchemaRequest, SchemaResponse};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub is_admin_user: bool,
}

/// GET /config
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(state.connector.config())
}

/// GET /admin
pub async fn is_admin_user(State(state): State<AppState>) -> Json<AdminResponse> {
    Json(AdminResponse {
        is_admin_user: state.connector.is_admin_user(),
    })
}

/// POST /schema
///
/// **Request:** `{}` for the full schema, or `{"fields": [{"name": "..."}]}`
/// to narrow it. Unknown names are dropped.
pub async fn get_schema(
    State(state): State<AppState>,
    Json(payload): Json<SchemaRequest>,
) -> Json<SchemaResponse> {
    Json(state.connector.schema(payload.fields.as_deref()))
}

/// Build schema and configuration routes
pub fn schema_routes() -> Router<AppState> {
    Router::new()
        .route("/config", get(get_config))
        .route("/admin", get(is_admin_user))
        .route("/schema", post(get_schema))
}
