//! Roles and the permission catalog.

use common::RoleId;
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateRoot, EventBuffer};
use crate::error::RoleError;
use crate::event::DomainEvent;

/// A grantable capability, identified by a stable code like `Roles:Create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    code: String,
    description: String,
}

impl Permission {
    fn new(code: &str, description: &str) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// The fixed permission catalog.
pub mod permissions {
    use super::Permission;

    pub const USERS_READ: &str = "Users:Read";
    pub const USERS_CREATE: &str = "Users:Create";
    pub const USERS_UPDATE: &str = "Users:Update";
    pub const USERS_DELETE: &str = "Users:Delete";
    pub const ROLES_READ: &str = "Roles:Read";
    pub const ROLES_CREATE: &str = "Roles:Create";
    pub const ROLES_UPDATE: &str = "Roles:Update";
    pub const ROLES_DELETE: &str = "Roles:Delete";

    /// Every permission the system knows about.
    pub fn all() -> Vec<Permission> {
        vec![
            Permission::new(USERS_READ, "Read user information"),
            Permission::new(USERS_CREATE, "Create new users"),
            Permission::new(USERS_UPDATE, "Update user information"),
            Permission::new(USERS_DELETE, "Delete users"),
            Permission::new(ROLES_READ, "Read role information"),
            Permission::new(ROLES_CREATE, "Create new roles"),
            Permission::new(ROLES_UPDATE, "Update role information"),
            Permission::new(ROLES_DELETE, "Delete roles"),
        ]
    }

    /// Looks up a catalog permission by code.
    pub fn by_code(code: &str) -> Option<Permission> {
        all().into_iter().find(|p| p.code() == code)
    }
}

/// Role aggregate: a named set of permission codes.
#[derive(Debug, Clone)]
pub struct Role {
    id: RoleId,
    name: String,
    description: String,
    permissions: Vec<Permission>,
    events: EventBuffer,
}

impl AggregateRoot for Role {
    type Id = RoleId;

    fn id(&self) -> RoleId {
        self.id
    }

    fn take_events(&mut self) -> Vec<DomainEvent> {
        self.events.take()
    }

    fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

impl Role {
    /// Creates a role with no permissions.
    pub fn create(name: &str, description: &str) -> Result<Self, RoleError> {
        if name.trim().is_empty() {
            return Err(RoleError::EmptyName);
        }
        Ok(Self {
            id: RoleId::new(),
            name: name.to_string(),
            description: description.to_string(),
            permissions: Vec::new(),
            events: EventBuffer::new(),
        })
    }

    /// Restores a role from persisted fields.
    pub fn rehydrate(
        id: RoleId,
        name: String,
        description: String,
        permissions: Vec<Permission>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            permissions,
            events: EventBuffer::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn permission_codes(&self) -> Vec<String> {
        self.permissions.iter().map(|p| p.code().to_string()).collect()
    }

    pub fn has_permission(&self, code: &str) -> bool {
        self.permissions.iter().any(|p| p.code() == code)
    }

    /// Adds a permission. Duplicate codes are ignored.
    pub fn add_permission(&mut self, permission: Permission) {
        if !self.has_permission(permission.code()) {
            self.permissions.push(permission);
        }
    }

    /// Removes a permission by code. Unknown codes are ignored.
    pub fn remove_permission(&mut self, code: &str) {
        self.permissions.retain(|p| p.code() != code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_name() {
        assert_eq!(Role::create("  ", "x").unwrap_err(), RoleError::EmptyName);
        assert!(Role::create("Admin", "Administrators").is_ok());
    }

    #[test]
    fn add_permission_ignores_duplicates() {
        let mut role = Role::create("Admin", "").unwrap();
        role.add_permission(permissions::by_code(permissions::ROLES_CREATE).unwrap());
        role.add_permission(permissions::by_code(permissions::ROLES_CREATE).unwrap());

        assert_eq!(role.permissions().len(), 1);
        assert!(role.has_permission("Roles:Create"));
    }

    #[test]
    fn remove_permission_ignores_unknown_codes() {
        let mut role = Role::create("Admin", "").unwrap();
        role.add_permission(permissions::by_code(permissions::USERS_READ).unwrap());

        role.remove_permission("Not:AThing");
        assert_eq!(role.permissions().len(), 1);

        role.remove_permission("Users:Read");
        assert!(role.permissions().is_empty());
    }

    #[test]
    fn catalog_has_eight_entries() {
        assert_eq!(permissions::all().len(), 8);
        assert!(permissions::by_code("Roles:Update").is_some());
        assert!(permissions::by_code("Unknown:Code").is_none());
    }

    #[test]
    fn rehydrate_restores_permissions_without_events() {
        let role = Role::rehydrate(
            RoleId::new(),
            "Admin".to_string(),
            "Full access".to_string(),
            permissions::all(),
        );

        assert!(role.has_permission(permissions::ROLES_CREATE));
        assert_eq!(role.permission_codes().len(), 8);
        assert!(!role.has_pending_events());
    }
}
