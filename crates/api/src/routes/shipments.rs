//! Shipment endpoints.

use application::{CreateShipmentRequest, ShipmentResponse};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common::ShipmentId;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

/// POST /shipments
pub async fn create_shipment(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<CreateShipmentRequest>,
) -> Result<(StatusCode, Json<ShipmentResponse>), ApiError> {
    let shipment = state.app.shipments.create_shipment(req).await?;
    Ok((StatusCode::CREATED, Json(shipment)))
}

/// POST /shipments/{id}/ship
pub async fn mark_as_shipped(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(shipment_id): Path<ShipmentId>,
) -> Result<Json<ShipmentResponse>, ApiError> {
    let shipment = state.app.shipments.mark_as_shipped(shipment_id).await?;
    Ok(Json(shipment))
}
