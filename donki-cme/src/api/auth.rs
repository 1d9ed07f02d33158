//! Authentication endpoints
//!
//! - `GET /auth/type` - mechanism the host should collect (API key)
//! - `POST /auth/credentials` - store credentials
//! - `GET /auth/credentials` - masked view of the stored credential
//! - `DELETE /auth/credentials` - forget the stored credential
//! - `GET /auth/valid` - check the stored credential upstream

use axum::{extract::State, routing::get, Json, Router};
use donki_common::Credential;
use serde::Serialize;

use crate::connector::{AuthTypeResponse, SetCredentialsRequest, SetCredentialsResponse};
use crate::{ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct MaskedCredentialsResponse {
    /// Stored credential with values masked; null when not authenticated
    pub credentials: Option<Credential>,
}

#[derive(Debug, Serialize)]
pub struct AuthValidResponse {
    pub valid: bool,
}

#[derive(Debug, Serialize)]
pub struct ResetAuthResponse {
    pub success: bool,
}

/// GET /auth/type
pub async fn get_auth_type(State(state): State<AppState>) -> Json<AuthTypeResponse> {
    Json(state.connector.auth_type())
}

/// POST /auth/credentials
///
/// **Request:** `{"key": "..."}` or `{"userPass": {"username": "...", "password": "..."}}`
/// **Response:** `{"errorCode": "NONE"}` or `{"errorCode": "INVALID_CREDENTIALS"}`
pub async fn set_credentials(
    State(state): State<AppState>,
    Json(payload): Json<SetCredentialsRequest>,
) -> ApiResult<Json<SetCredentialsResponse>> {
    Ok(Json(state.connector.set_credentials(payload).await?))
}

/// GET /auth/credentials
pub async fn get_masked_credentials(
    State(state): State<AppState>,
) -> ApiResult<Json<MaskedCredentialsResponse>> {
    let credentials = state.connector.masked_credentials().await?;
    Ok(Json(MaskedCredentialsResponse { credentials }))
}

/// DELETE /auth/credentials
pub async fn reset_auth(State(state): State<AppState>) -> ApiResult<Json<ResetAuthResponse>> {
    state.connector.reset_auth().await?;
    Ok(Json(ResetAuthResponse { success: true }))
}

/// GET /auth/valid
pub async fn is_auth_valid(State(state): State<AppState>) -> Json<AuthValidResponse> {
    Json(AuthValidResponse {
        valid: state.connector.is_auth_valid().await,
    })
}

/// Build authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/type", get(get_auth_type))
        .route(
            "/auth/credentials",
            get(get_masked_credentials)
                .post(set_credentials)
                .delete(reset_auth),
        )
        .route("/auth/valid", get(is_auth_valid))
}
