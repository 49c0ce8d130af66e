use core::str::FromStr;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use erha_core::{DomainError, DomainResult};

use crate::Role;

/// Identity of an authenticated principal (human user, service account, etc).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for PrincipalId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for PrincipalId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid =
            Uuid::from_str(s).map_err(|e| DomainError::invalid_id(format!("PrincipalId: {e}")))?;
        Ok(Self(uuid))
    }
}

/// A resolved principal for authorization decisions.
///
/// Always carries at least one role. Construction is decoupled from storage
/// and transport: the request layer derives it from verified claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PrincipalRepr")]
pub struct Principal {
    principal_id: PrincipalId,
    roles: BTreeSet<Role>,
}

/// Wire form of [`Principal`]; decoding goes through [`Principal::new`].
#[derive(Deserialize)]
struct PrincipalRepr {
    principal_id: PrincipalId,
    roles: Vec<Role>,
}

impl TryFrom<PrincipalRepr> for Principal {
    type Error = DomainError;

    fn try_from(repr: PrincipalRepr) -> Result<Self, Self::Error> {
        Self::new(repr.principal_id, repr.roles)
    }
}

impl Principal {
    pub fn new(
        principal_id: PrincipalId,
        roles: impl IntoIterator<Item = Role>,
    ) -> DomainResult<Self> {
        let roles: BTreeSet<Role> = roles.into_iter().collect();
        if roles.is_empty() {
            return Err(DomainError::validation(format!(
                "principal {principal_id} must hold at least one role"
            )));
        }
        Ok(Self {
            principal_id,
            roles,
        })
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
