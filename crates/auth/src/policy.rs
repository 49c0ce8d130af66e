//! Role → permission table.
//!
//! The table is built once at startup and never mutated afterwards. Share it
//! behind an `Arc` (see [`AuthorizationResolver`](crate::AuthorizationResolver)).

use std::collections::{BTreeMap, BTreeSet};

use crate::{Permission, Role};

/// Immutable mapping from each role to the permissions it grants.
///
/// A role without an entry resolves to the empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolePermissionMap {
    grants: BTreeMap<Role, BTreeSet<Permission>>,
}

impl RolePermissionMap {
    pub fn builder() -> RolePermissionMapBuilder {
        RolePermissionMapBuilder::default()
    }

    /// A table with no grants at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Permissions configured for `role` (borrowed), if the role has an entry.
    pub fn get(&self, role: Role) -> Option<&BTreeSet<Permission>> {
        self.grants.get(&role)
    }

    /// Roles with an explicit entry, in `Role` order.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.grants.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &BTreeSet<Permission>)> + '_ {
        self.grants.iter().map(|(r, p)| (*r, p))
    }

    /// The business table used in production.
    pub fn standard() -> Self {
        use Permission::*;

        Self::builder()
            .grant_system_admin_scope(Role::SystemAdmin)
            .grant(
                Role::Admin,
                [
                    // RFQ
                    ViewAllRfqs,
                    CreateRfq,
                    EditAllRfqs,
                    DeleteRfq,
                    // Quote
                    ViewAllQuotes,
                    CreateQuote,
                    EditAllQuotes,
                    DeleteQuote,
                    ApproveQuote,
                    ReviseQuote,
                    SendQuoteDocusign,
                    ViewQuoteFinancials,
                    EditApprovedQuote,
                    // Job
                    ViewAllJobs,
                    CreateJob,
                    EditJob,
                    DeleteJob,
                    UpdateJobProgress,
                    CreateEmergencyJob,
                    CloseJob,
                    ReopenClosedJob,
                    // Client
                    ViewClients,
                    CreateClient,
                    EditClient,
                    DeleteClient,
                    ViewClientFinancials,
                    // User management
                    ViewUsers,
                    CreateUser,
                    EditUser,
                    DeleteUser,
                    AssignRoles,
                    ResetUserPassword,
                    ManageUserPins,
                    // Financial
                    ViewFinancialReports,
                    ViewProfitMargins,
                    ViewCostBreakdown,
                    ExportFinancialData,
                    // System
                    ViewAuditLogs,
                    ViewSystemHealth,
                    // Reporting
                    ViewReports,
                    CreateCustomReports,
                    ExportReports,
                    ScheduleReports,
                    // Workflow
                    OverrideWorkflow,
                    // Documents
                    UploadDocuments,
                    DeleteDocuments,
                    ViewAllDocuments,
                ],
            )
            .grant(
                Role::Executive,
                [
                    ViewAllRfqs,
                    ViewAllQuotes,
                    ViewQuoteFinancials,
                    ViewAllJobs,
                    ViewClients,
                    ViewClientFinancials,
                    ViewFinancialReports,
                    ViewProfitMargins,
                    ViewCostBreakdown,
                    ExportFinancialData,
                    ViewReports,
                    ExportReports,
                    ViewSystemHealth,
                    ViewAllDocuments,
                ],
            )
            .grant(
                Role::Manager,
                [
                    ViewAllRfqs,
                    CreateRfq,
                    EditAllRfqs,
                    DeleteRfq,
                    ViewAllQuotes,
                    CreateQuote,
                    EditAllQuotes,
                    ApproveQuote,
                    ReviseQuote,
                    SendQuoteDocusign,
                    ViewQuoteFinancials,
                    ViewAllJobs,
                    CreateJob,
                    EditJob,
                    UpdateJobProgress,
                    CreateEmergencyJob,
                    CloseJob,
                    ViewClients,
                    CreateClient,
                    EditClient,
                    ViewClientFinancials,
                    ViewFinancialReports,
                    ViewProfitMargins,
                    ViewCostBreakdown,
                    ViewReports,
                    ExportReports,
                    UploadDocuments,
                    ViewAllDocuments,
                ],
            )
            .grant(
                Role::Estimator,
                [
                    ViewOwnRfqs,
                    CreateRfq,
                    EditOwnRfqs,
                    ViewOwnQuotes,
                    CreateQuote,
                    EditOwnQuotes,
                    ReviseQuote,
                    ViewOwnJobs,
                    ViewClients,
                    UploadDocuments,
                    ViewAllDocuments,
                ],
            )
            .grant(
                Role::Finance,
                [
                    ViewAllRfqs,
                    ViewAllQuotes,
                    ViewQuoteFinancials,
                    ViewAllJobs,
                    ViewClients,
                    ViewClientFinancials,
                    ViewFinancialReports,
                    ViewProfitMargins,
                    ViewCostBreakdown,
                    ExportFinancialData,
                    ViewReports,
                    CreateCustomReports,
                    ExportReports,
                    ViewAllDocuments,
                ],
            )
            .grant(
                Role::HumanResources,
                [
                    ViewUsers,
                    CreateUser,
                    EditUser,
                    DeleteUser,
                    AssignRoles,
                    ResetUserPassword,
                    ManageUserPins,
                    ViewEmployeeData,
                    ManageEmployees,
                    ViewTimesheets,
                    ApproveTimesheets,
                    ViewReports,
                    ExportReports,
                ],
            )
            .build()
    }
}

/// Builder for [`RolePermissionMap`]. Grants for the same role accumulate.
#[derive(Debug, Default)]
pub struct RolePermissionMapBuilder {
    grants: BTreeMap<Role, BTreeSet<Permission>>,
}

impl RolePermissionMapBuilder {
    pub fn grant(mut self, role: Role, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.grants.entry(role).or_default().extend(permissions);
        self
    }

    /// Give `role` every permission whose catalogue row opts into the
    /// superuser scope. Enumerated now, not re-evaluated per call.
    pub fn grant_system_admin_scope(self, role: Role) -> Self {
        let scope = Permission::ALL
            .iter()
            .copied()
            .filter(Permission::granted_to_system_admin);
        self.grant(role, scope)
    }

    /// Register `role` with an empty permission set.
    pub fn declare(mut self, role: Role) -> Self {
        self.grants.entry(role).or_default();
        self
    }

    pub fn build(self) -> RolePermissionMap {
        RolePermissionMap {
            grants: self.grants,
        }
    }
}
