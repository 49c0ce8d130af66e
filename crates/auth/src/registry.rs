//! Catalogue of roles and permissions for audit/display.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{AuthorizationResolver, Permission, PermissionCategory, Role};

/// Role definition with its granted permissions.
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub name: Role,
    pub description: &'static str,
    pub permissions: Vec<Permission>,
}

/// Permission definition with the roles that hold it.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionDefinition {
    pub name: Permission,
    pub description: &'static str,
    pub category: PermissionCategory,
    pub granted_to: Vec<Role>,
}

/// Complete view of the RBAC configuration, built from a resolver's table.
#[derive(Debug, Clone, Serialize)]
pub struct RbacRegistry {
    pub roles: BTreeMap<Role, RoleDefinition>,
    pub permissions: BTreeMap<Permission, PermissionDefinition>,
}

impl RbacRegistry {
    pub fn from_resolver(resolver: &AuthorizationResolver) -> Self {
        let roles = Role::ALL
            .iter()
            .map(|role| {
                let def = RoleDefinition {
                    name: *role,
                    description: role.description(),
                    permissions: resolver.permissions_for_role(*role).into_iter().collect(),
                };
                (*role, def)
            })
            .collect();

        let permissions = Permission::ALL
            .iter()
            .map(|p| {
                let def = PermissionDefinition {
                    name: *p,
                    description: p.description(),
                    category: p.category(),
                    granted_to: resolver.roles_with_permission(*p).into_iter().collect(),
                };
                (*p, def)
            })
            .collect();

        Self { roles, permissions }
    }

    /// Permissions that no role grants (candidates for cleanup).
    pub fn unassigned_permissions(&self) -> Vec<Permission> {
        self.permissions
            .values()
            .filter(|d| d.granted_to.is_empty())
            .map(|d| d.name)
            .collect()
    }

    pub fn by_category(&self, category: PermissionCategory) -> Vec<Permission> {
        self.permissions
            .values()
            .filter(|d| d.category == category)
            .map(|d| d.name)
            .collect()
    }
}
