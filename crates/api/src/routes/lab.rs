//! Lab test endpoints.

use application::LabTestResponse;
use axum::extract::{Path, State};
use axum::Json;
use common::{LabTestId, OrderId};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

#[derive(Deserialize)]
pub struct RecordResultsRequest {
    pub order_id: OrderId,
    pub raw_data_json: String,
}

#[derive(Serialize)]
pub struct RecordResultsResponse {
    pub lab_test_id: LabTestId,
}

/// POST /lab-tests/record-results
///
/// Committing the results event generates the health report and the
/// owner notification downstream.
pub async fn record_results(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<RecordResultsRequest>,
) -> Result<Json<RecordResultsResponse>, ApiError> {
    let lab_test_id = state
        .app
        .lab
        .record_results(req.order_id, &req.raw_data_json)
        .await?;
    Ok(Json(RecordResultsResponse { lab_test_id }))
}

/// GET /lab-tests/order/{order_id}
pub async fn get_by_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(order_id): Path<OrderId>,
) -> Result<Json<LabTestResponse>, ApiError> {
    let test = state.app.lab.get_by_order(order_id).await?;
    Ok(Json(test))
}
