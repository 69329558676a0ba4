//! Authentication endpoints.

use application::LoginResponse;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct TwoFactorLoginRequest {
    pub email: String,
    pub password: String,
    pub code: String,
}

#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct TwoFactorSecretResponse {
    pub secret: String,
}

#[derive(Deserialize)]
pub struct EnableTwoFactorRequest {
    pub secret: String,
    pub code: String,
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = state.app.auth.login(&req.email, &req.password).await?;
    Ok(Json(response))
}

/// POST /auth/login-2fa
pub async fn login_two_factor(
    State(state): State<AppState>,
    Json(req): Json<TwoFactorLoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = state
        .app
        .auth
        .login_two_factor(&req.email, &req.password, &req.code)
        .await?;
    Ok(Json(response))
}

/// POST /auth/refresh-token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = state.app.auth.refresh_token(&req.refresh_token).await?;
    Ok(Json(response))
}

/// POST /auth/logout
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> Result<(), ApiError> {
    state.app.auth.logout(user.user_id).await?;
    Ok(())
}

/// POST /auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<(), ApiError> {
    state.app.auth.forgot_password(&req.email).await?;
    Ok(())
}

/// POST /auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<(), ApiError> {
    state
        .app
        .auth
        .reset_password(&req.email, &req.token, &req.new_password)
        .await?;
    Ok(())
}

/// POST /auth/2fa/generate
pub async fn generate_two_factor_secret(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Json<TwoFactorSecretResponse> {
    let secret = state.app.auth.generate_two_factor_secret().await;
    Json(TwoFactorSecretResponse { secret })
}

/// POST /auth/2fa/enable
pub async fn enable_two_factor(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<EnableTwoFactorRequest>,
) -> Result<(), ApiError> {
    state
        .app
        .auth
        .enable_two_factor(user.user_id, &req.secret, &req.code)
        .await?;
    Ok(())
}
