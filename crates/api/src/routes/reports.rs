//! Health report endpoints.

use application::ReportResponse;
use axum::extract::{Path, State};
use axum::Json;
use common::ReportId;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

/// GET /health-reports/{id}
pub async fn get_report(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(report_id): Path<ReportId>,
) -> Result<Json<ReportResponse>, ApiError> {
    let report = state.app.reports.get_report(report_id).await?;
    Ok(Json(report))
}
