//! Order endpoints.

use application::{CreateOrderRequest, OrderResponse, PaymentResponse};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common::OrderId;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

#[derive(Deserialize)]
pub struct PayOrderRequest {
    pub payment_token: String,
}

/// POST /orders
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order = state.app.orders.create_order(user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders
pub async fn get_my_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<Vec<OrderResponse>> {
    Json(state.app.orders.get_my_orders(user.user_id).await)
}

/// POST /orders/{id}/pay
pub async fn pay_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<OrderId>,
    Json(req): Json<PayOrderRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let payment = state
        .app
        .orders
        .pay_order(user.user_id, order_id, &req.payment_token)
        .await?;
    Ok(Json(payment))
}
