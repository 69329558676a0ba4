//! Support ticket endpoints.

use application::TicketResponse;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common::TicketId;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateTicketRequest {
    pub subject: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct TicketCreatedResponse {
    pub id: TicketId,
}

#[derive(Deserialize)]
pub struct ReplyRequest {
    pub content: String,
}

/// POST /tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<TicketCreatedResponse>), ApiError> {
    let id = state
        .app
        .support
        .create_ticket(user.user_id, &req.subject, &req.message)
        .await?;
    Ok((StatusCode::CREATED, Json(TicketCreatedResponse { id })))
}

/// POST /tickets/{id}/reply
pub async fn add_reply(
    State(state): State<AppState>,
    user: AuthUser,
    Path(ticket_id): Path<TicketId>,
    Json(req): Json<ReplyRequest>,
) -> Result<Json<TicketResponse>, ApiError> {
    let ticket = state
        .app
        .support
        .add_reply(ticket_id, user.user_id, &req.content)
        .await?;
    Ok(Json(ticket))
}

/// POST /tickets/{id}/resolve
pub async fn resolve_ticket(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(ticket_id): Path<TicketId>,
) -> Result<(), ApiError> {
    state.app.support.resolve_ticket(ticket_id).await?;
    Ok(())
}

/// GET /tickets
pub async fn get_my_tickets(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<Vec<TicketResponse>> {
    Json(state.app.support.get_my_tickets(user.user_id).await)
}
