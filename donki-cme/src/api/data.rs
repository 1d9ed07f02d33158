//! Data endpoint

use axum::{extract::State, routing::post, Json, Router};

use crate::connector::{DataRequest, DataResponse};
use crate::{ApiResult, AppState};

/// POST /data
///
/// **Request:**
/// `{"fields": [{"name": "activityID"}], "dateRange": {"startDate": "2023-03-01", "endDate": "2023-03-31"}}`
///
/// **Errors:**
/// - 400 Bad Request: a requested field has no extractor
/// - 502 Bad Gateway: upstream transport failure, non-200 status or unparseable body
pub async fn get_data(
    State(state): State<AppState>,
    Json(payload): Json<DataRequest>,
) -> ApiResult<Json<DataResponse>> {
    Ok(Json(state.connector.data(&payload).await?))
}

/// Build data routes
pub fn data_routes() -> Router<AppState> {
    Router::new().route("/data", post(get_data))
}
