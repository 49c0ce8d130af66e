use core::str::FromStr;

use serde::{Deserialize, Serialize};

use erha_core::DomainError;

/// Role identifier used for RBAC.
///
/// Roles form a closed set; which permissions each role carries is decided by
/// a [`RolePermissionMap`](crate::RolePermissionMap), not by the role itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Technical administrator (database, integrations, backups).
    SystemAdmin,
    /// Business administrator: approvals, users, full business visibility.
    Admin,
    /// Read-only oversight: dashboards and reports.
    Executive,
    /// Operations manager: approves quotes, oversees workflow.
    Manager,
    /// Creates and edits own RFQs and quotes.
    Estimator,
    /// Financial oversight: margins, costs, exports.
    Finance,
    /// Employee data, timesheets, user accounts.
    HumanResources,
}

/// Prefix used when a role is rendered as an authority string.
pub const ROLE_AUTHORITY_PREFIX: &str = "ROLE_";

impl Role {
    pub const ALL: &'static [Role] = &[
        Role::SystemAdmin,
        Role::Admin,
        Role::Executive,
        Role::Manager,
        Role::Estimator,
        Role::Finance,
        Role::HumanResources,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemAdmin => "SYSTEM_ADMIN",
            Self::Admin => "ADMIN",
            Self::Executive => "EXECUTIVE",
            Self::Manager => "MANAGER",
            Self::Estimator => "ESTIMATOR",
            Self::Finance => "FINANCE",
            Self::HumanResources => "HUMAN_RESOURCES",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::SystemAdmin => "Technical administrator with every permission",
            Self::Admin => "Business administrator with full operational access",
            Self::Executive => "Read-only oversight of dashboards and reports",
            Self::Manager => "Operations manager who approves quotes and oversees jobs",
            Self::Estimator => "Quote creator limited to own RFQs and quotes",
            Self::Finance => "Financial oversight with read-only business visibility",
            Self::HumanResources => "User accounts, employee data and timesheets",
        }
    }

    /// Authority string, e.g. `ROLE_MANAGER`.
    pub fn authority(&self) -> String {
        format!("{ROLE_AUTHORITY_PREFIX}{}", self.as_str())
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses `MANAGER` as well as the authority form `ROLE_MANAGER`.
impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix(ROLE_AUTHORITY_PREFIX).unwrap_or(s);
        Role::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == name)
            .ok_or_else(|| DomainError::validation(format!("unknown role '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_authority_forms() {
        assert_eq!(Role::from_str("ESTIMATOR").unwrap(), Role::Estimator);
        assert_eq!(Role::from_str("ROLE_HUMAN_RESOURCES").unwrap(), Role::HumanResources);
        assert!(Role::from_str("estimator").is_err());
        assert!(Role::from_str("GUEST").is_err());
    }

    #[test]
    fn serde_uses_stable_names() {
        let json = serde_json::to_string(&Role::SystemAdmin).unwrap();
        assert_eq!(json, "\"SYSTEM_ADMIN\"");
        let back: Role = serde_json::from_str("\"FINANCE\"").unwrap();
        assert_eq!(back, Role::Finance);
    }

    #[test]
    fn authority_is_prefixed() {
        assert_eq!(Role::Manager.authority(), "ROLE_MANAGER");
    }
}
