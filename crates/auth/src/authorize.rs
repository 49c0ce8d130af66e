use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::{AuthorizationResolver, Permission, Principal, PrincipalId, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// The principal's effective permissions do not include the required one.
    #[error("forbidden: principal {principal_id} is missing permission '{permission}'")]
    AuthorizationDenied {
        principal_id: PrincipalId,
        permission: Permission,
    },

    /// None of the acceptable permissions is held.
    #[error("forbidden: principal {principal_id} holds none of {permissions:?}")]
    AuthorizationDeniedAny {
        principal_id: PrincipalId,
        permissions: Vec<Permission>,
    },
}

/// Command-side authorization contract (checked at the command boundary).
///
/// Implement this on commands that require permissions. Every listed
/// permission must be held; the check runs before any side effect.
pub trait CommandAuthorization {
    fn required_permissions(&self) -> &[Permission];
}

/// Authorize a principal for one permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(
    resolver: &AuthorizationResolver,
    principal: &Principal,
    required: Permission,
) -> Result<(), AuthzError> {
    if resolver.roles_have_permission(principal.roles(), required) {
        Ok(())
    } else {
        tracing::warn!(
            principal_id = %principal.principal_id(),
            permission = %required,
            "authorization denied"
        );
        Err(AuthzError::AuthorizationDenied {
            principal_id: principal.principal_id(),
            permission: required,
        })
    }
}

/// Authorize when holding any one of `acceptable` is enough
/// (e.g. "view all quotes" or "view own quotes").
pub fn authorize_any(
    resolver: &AuthorizationResolver,
    principal: &Principal,
    acceptable: &[Permission],
) -> Result<(), AuthzError> {
    if resolver.roles_have_any_permission(principal.roles(), acceptable) {
        Ok(())
    } else {
        tracing::warn!(
            principal_id = %principal.principal_id(),
            permissions = ?acceptable,
            "authorization denied"
        );
        Err(AuthzError::AuthorizationDeniedAny {
            principal_id: principal.principal_id(),
            permissions: acceptable.to_vec(),
        })
    }
}

/// Check every permission a command requires.
pub fn authorize_command<C: CommandAuthorization + ?Sized>(
    resolver: &AuthorizationResolver,
    principal: &Principal,
    command: &C,
) -> Result<(), AuthzError> {
    for permission in command.required_permissions() {
        authorize(resolver, principal, *permission)?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    /// The permission that was being checked.
    pub required_permission: Permission,

    /// Whether the authorization was granted.
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    pub principal_id: PrincipalId,
    pub roles: Vec<Role>,
    pub effective_permissions: Vec<Permission>,

    /// Roles that would grant the missing permission (empty when granted).
    pub granting_roles: Vec<Role>,
}

/// Explain why an authorization decision was made (or would be made).
///
/// Answers "why was this request allowed/denied?" for audit views. Agrees
/// with [`authorize`] on the outcome.
pub fn explain_authorization(
    resolver: &AuthorizationResolver,
    principal: &Principal,
    required: Permission,
) -> AuthorizationExplanation {
    let effective: BTreeSet<Permission> = resolver.permissions_for_roles(principal.roles());
    let granted = effective.contains(&required);

    let (reason, granting_roles) = if granted {
        let via: Vec<Role> = principal
            .roles()
            .iter()
            .copied()
            .filter(|r| resolver.role_has_permission(*r, required))
            .collect();
        (
            format!("permission '{required}' granted by role(s) {via:?}"),
            Vec::new(),
        )
    } else {
        let candidates: Vec<Role> = resolver.roles_with_permission(required).into_iter().collect();
        (
            format!(
                "permission '{required}' is not granted by any held role; roles that grant it: {candidates:?}"
            ),
            candidates,
        )
    };

    AuthorizationExplanation {
        required_permission: required,
        granted,
        reason,
        principal_id: principal.principal_id(),
        roles: principal.roles().iter().copied().collect(),
        effective_permissions: effective.into_iter().collect(),
        granting_roles,
    }
}
