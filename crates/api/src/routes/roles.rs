//! Role and permission management endpoints.

use application::{PermissionResponse, RoleResponse};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common::RoleId;
use domain::role::permissions;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: String,
}

#[derive(Serialize)]
pub struct RoleCreatedResponse {
    pub id: RoleId,
}

#[derive(Deserialize)]
pub struct AssignPermissionsRequest {
    pub permissions: Vec<String>,
}

/// POST /roles
pub async fn create_role(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<RoleCreatedResponse>), ApiError> {
    user.require_permission(permissions::ROLES_CREATE)?;
    let id = state.app.roles.create_role(&req.name, &req.description).await?;
    Ok((StatusCode::CREATED, Json(RoleCreatedResponse { id })))
}

/// GET /roles/permissions — the full permission catalog.
pub async fn get_permissions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<PermissionResponse>>, ApiError> {
    user.require_permission(permissions::ROLES_READ)?;
    Ok(Json(state.app.roles.get_permissions()))
}

/// POST /roles/{id}/permissions
pub async fn assign_permissions(
    State(state): State<AppState>,
    user: AuthUser,
    Path(role_id): Path<RoleId>,
    Json(req): Json<AssignPermissionsRequest>,
) -> Result<Json<RoleResponse>, ApiError> {
    user.require_permission(permissions::ROLES_UPDATE)?;
    let role = state
        .app
        .roles
        .assign_permissions(role_id, req.permissions)
        .await?;
    Ok(Json(role))
}
