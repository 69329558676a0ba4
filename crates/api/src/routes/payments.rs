//! Direct payment endpoint.

use application::PaymentResponse;
use axum::extract::State;
use axum::Json;
use common::OrderId;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

#[derive(Deserialize)]
pub struct ProcessPaymentRequest {
    pub order_id: OrderId,
    pub payment_token: String,
}

/// POST /payments
pub async fn process_payment(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<ProcessPaymentRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let payment = state
        .app
        .payments
        .process_payment(req.order_id, &req.payment_token)
        .await?;
    Ok(Json(payment))
}
