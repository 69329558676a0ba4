//! Pet endpoints.

use application::{CreatePetRequest, PetResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

/// POST /pets
pub async fn create_pet(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreatePetRequest>,
) -> Result<(StatusCode, Json<PetResponse>), ApiError> {
    let pet = state.app.pets.create_pet(user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(pet)))
}

/// GET /pets
pub async fn get_my_pets(State(state): State<AppState>, user: AuthUser) -> Json<Vec<PetResponse>> {
    Json(state.app.pets.get_my_pets(user.user_id).await)
}
