//! User registration and profile endpoints.

use application::{CreateUserRequest, RegisterUserRequest, UserProfileResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use common::UserId;
use domain::role::permissions;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

#[derive(Serialize)]
pub struct UserCreatedResponse {
    pub id: UserId,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// POST /users/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserCreatedResponse>), ApiError> {
    let id = state.app.users.register(req).await?;
    Ok((StatusCode::CREATED, Json(UserCreatedResponse { id })))
}

/// POST /users — admin-driven account creation.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserCreatedResponse>), ApiError> {
    user.require_permission(permissions::USERS_CREATE)?;
    let id = state.app.users.create(req).await?;
    Ok((StatusCode::CREATED, Json(UserCreatedResponse { id })))
}

/// GET /users/me
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let profile = state.app.users.get_profile(user.user_id).await?;
    Ok(Json(profile))
}

/// PUT /users/me
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<(), ApiError> {
    state
        .app
        .users
        .update_profile(user.user_id, &req.first_name, &req.last_name)
        .await?;
    Ok(())
}

/// PUT /users/me/password
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<(), ApiError> {
    state
        .app
        .users
        .change_password(user.user_id, &req.current_password, &req.new_password)
        .await?;
    Ok(())
}
