//! Role and permission management.

use std::sync::Arc;

use common::RoleId;
use domain::role::permissions;
use domain::AggregateRoot;
use serde::Serialize;
use store::UnitOfWork;
use tracing::instrument;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct PermissionResponse {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleResponse {
    pub id: RoleId,
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
}

/// Role creation and permission assignment.
#[derive(Clone)]
pub struct RoleService {
    uow: Arc<UnitOfWork>,
}

impl RoleService {
    pub fn new(uow: Arc<UnitOfWork>) -> Self {
        Self { uow }
    }

    #[instrument(skip(self))]
    pub async fn create_role(&self, name: &str, description: &str) -> Result<RoleId, AppError> {
        let store = self.uow.store();
        if store.find_role_by_name(name).await.is_some() {
            return Err(AppError::RoleAlreadyExists);
        }

        let role = domain::Role::create(name, description)?;
        let role_id = role.id();
        store.roles.save(role).await;
        Ok(role_id)
    }

    /// Synchronizes a role's permissions with the requested set.
    ///
    /// Codes no longer requested are removed, new catalog codes are added,
    /// and codes absent from the catalog are silently ignored.
    #[instrument(skip(self, requested))]
    pub async fn assign_permissions(
        &self,
        role_id: RoleId,
        requested: Vec<String>,
    ) -> Result<RoleResponse, AppError> {
        let store = self.uow.store();
        let mut role = store.roles.get(role_id).await.ok_or(AppError::RoleNotFound)?;

        let current = role.permission_codes();
        for code in &current {
            if !requested.contains(code) {
                role.remove_permission(code);
            }
        }
        for code in &requested {
            if !current.contains(code) {
                if let Some(permission) = permissions::by_code(code) {
                    role.add_permission(permission);
                }
            }
        }

        let response = RoleResponse {
            id: role.id(),
            name: role.name().to_string(),
            description: role.description().to_string(),
            permissions: role.permission_codes(),
        };
        store.roles.save(role).await;
        Ok(response)
    }

    /// Returns the full permission catalog.
    pub fn get_permissions(&self) -> Vec<PermissionResponse> {
        permissions::all()
            .into_iter()
            .map(|p| PermissionResponse {
                code: p.code().to_string(),
                description: p.description().to_string(),
            })
            .collect()
    }
}
