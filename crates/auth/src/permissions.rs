use core::str::FromStr;

use serde::{Deserialize, Serialize};

use erha_core::DomainError;

/// Functional area a permission belongs to (for audit/display grouping).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCategory {
    Rfq,
    Quote,
    Job,
    Client,
    UserManagement,
    Financial,
    System,
    Reporting,
    Workflow,
    Documents,
    HumanResources,
}

impl PermissionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rfq => "rfq",
            Self::Quote => "quote",
            Self::Job => "job",
            Self::Client => "client",
            Self::UserManagement => "user_management",
            Self::Financial => "financial",
            Self::System => "system",
            Self::Reporting => "reporting",
            Self::Workflow => "workflow",
            Self::Documents => "documents",
            Self::HumanResources => "human_resources",
        }
    }
}

/// Generates the `Permission` enum and its lookup tables from one catalogue.
///
/// Every row must state whether `SYSTEM_ADMIN` receives the permission, so a
/// new variant cannot be added without deciding that explicitly.
macro_rules! permission_catalogue {
    ($( $variant:ident => $name:literal, $category:ident, system_admin: $sysadmin:literal, $desc:literal; )+) => {
        /// Grantable capability.
        ///
        /// The set is closed and flat (no hierarchy). The stable string form is
        /// the SCREAMING_SNAKE name, e.g. `APPROVE_QUOTE`.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum Permission {
            $( $variant, )+
        }

        impl Permission {
            /// Every defined permission, in catalogue order.
            pub const ALL: &'static [Permission] = &[ $( Permission::$variant, )+ ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )+
                }
            }

            pub fn category(&self) -> PermissionCategory {
                match self {
                    $( Self::$variant => PermissionCategory::$category, )+
                }
            }

            pub fn description(&self) -> &'static str {
                match self {
                    $( Self::$variant => $desc, )+
                }
            }

            /// Whether the superuser role is granted this permission.
            pub fn granted_to_system_admin(&self) -> bool {
                match self {
                    $( Self::$variant => $sysadmin, )+
                }
            }
        }

        impl FromStr for Permission {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $name => Ok(Self::$variant), )+
                    _ => Err(DomainError::validation(format!("unknown permission '{s}'"))),
                }
            }
        }
    };
}

permission_catalogue! {
    ViewOwnRfqs => "VIEW_OWN_RFQS", Rfq, system_admin: true, "View RFQs created by this user";
    ViewAllRfqs => "VIEW_ALL_RFQS", Rfq, system_admin: true, "View all RFQs";
    CreateRfq => "CREATE_RFQ", Rfq, system_admin: true, "Create a new RFQ";
    EditOwnRfqs => "EDIT_OWN_RFQS", Rfq, system_admin: true, "Edit RFQs created by this user";
    EditAllRfqs => "EDIT_ALL_RFQS", Rfq, system_admin: true, "Edit any RFQ";
    DeleteRfq => "DELETE_RFQ", Rfq, system_admin: true, "Soft delete RFQs";

    ViewOwnQuotes => "VIEW_OWN_QUOTES", Quote, system_admin: true, "View quotes created by this user";
    ViewAllQuotes => "VIEW_ALL_QUOTES", Quote, system_admin: true, "View all quotes";
    CreateQuote => "CREATE_QUOTE", Quote, system_admin: true, "Generate a quote from an RFQ";
    EditOwnQuotes => "EDIT_OWN_QUOTES", Quote, system_admin: true, "Edit own quotes before approval";
    EditAllQuotes => "EDIT_ALL_QUOTES", Quote, system_admin: true, "Edit any quote";
    DeleteQuote => "DELETE_QUOTE", Quote, system_admin: true, "Soft delete quotes";
    ApproveQuote => "APPROVE_QUOTE", Quote, system_admin: true, "Approve a quote with PIN";
    ReviseQuote => "REVISE_QUOTE", Quote, system_admin: true, "Create a quote revision";
    SendQuoteDocusign => "SEND_QUOTE_DOCUSIGN", Quote, system_admin: true, "Send a quote for e-signature";
    ViewQuoteFinancials => "VIEW_QUOTE_FINANCIALS", Quote, system_admin: true, "View pricing, margins and costs";

    ViewOwnJobs => "VIEW_OWN_JOBS", Job, system_admin: true, "View jobs created from own quotes";
    ViewAllJobs => "VIEW_ALL_JOBS", Job, system_admin: true, "View all jobs";
    CreateJob => "CREATE_JOB", Job, system_admin: true, "Convert a quote to a job";
    EditJob => "EDIT_JOB", Job, system_admin: true, "Edit job details";
    DeleteJob => "DELETE_JOB", Job, system_admin: true, "Soft delete jobs";
    UpdateJobProgress => "UPDATE_JOB_PROGRESS", Job, system_admin: true, "Update work progress tracking";
    CreateEmergencyJob => "CREATE_EMERGENCY_JOB", Job, system_admin: true, "Create a job without RFQ/quote";
    CloseJob => "CLOSE_JOB", Job, system_admin: true, "Mark a job as completed";

    ViewClients => "VIEW_CLIENTS", Client, system_admin: true, "View client records";
    CreateClient => "CREATE_CLIENT", Client, system_admin: true, "Add a new client";
    EditClient => "EDIT_CLIENT", Client, system_admin: true, "Edit client details";
    DeleteClient => "DELETE_CLIENT", Client, system_admin: true, "Soft delete a client";
    ViewClientFinancials => "VIEW_CLIENT_FINANCIALS", Client, system_admin: true, "View client payment history and credit";

    ViewUsers => "VIEW_USERS", UserManagement, system_admin: true, "View the user list";
    CreateUser => "CREATE_USER", UserManagement, system_admin: true, "Add a user account";
    EditUser => "EDIT_USER", UserManagement, system_admin: true, "Edit user details";
    DeleteUser => "DELETE_USER", UserManagement, system_admin: true, "Deactivate a user account";
    AssignRoles => "ASSIGN_ROLES", UserManagement, system_admin: true, "Assign or remove user roles";
    ResetUserPassword => "RESET_USER_PASSWORD", UserManagement, system_admin: true, "Reset user passwords";
    ManageUserPins => "MANAGE_USER_PINS", UserManagement, system_admin: true, "Set or reset approval PINs";

    ViewFinancialReports => "VIEW_FINANCIAL_REPORTS", Financial, system_admin: true, "Access financial dashboards";
    ViewProfitMargins => "VIEW_PROFIT_MARGINS", Financial, system_admin: true, "View quote/job profitability";
    ViewCostBreakdown => "VIEW_COST_BREAKDOWN", Financial, system_admin: true, "View detailed cost analysis";
    ExportFinancialData => "EXPORT_FINANCIAL_DATA", Financial, system_admin: true, "Export financial reports";

    ViewAuditLogs => "VIEW_AUDIT_LOGS", System, system_admin: true, "View the audit trail";
    ManageSystemSettings => "MANAGE_SYSTEM_SETTINGS", System, system_admin: true, "Configure system parameters";
    BackupDatabase => "BACKUP_DATABASE", System, system_admin: true, "Trigger database backups";
    ManageIntegrations => "MANAGE_INTEGRATIONS", System, system_admin: true, "Configure e-signature, email and other integrations";
    ViewSystemHealth => "VIEW_SYSTEM_HEALTH", System, system_admin: true, "Monitor system health";

    ViewReports => "VIEW_REPORTS", Reporting, system_admin: true, "Access standard reports";
    CreateCustomReports => "CREATE_CUSTOM_REPORTS", Reporting, system_admin: true, "Build custom reports";
    ExportReports => "EXPORT_REPORTS", Reporting, system_admin: true, "Export reports";
    ScheduleReports => "SCHEDULE_REPORTS", Reporting, system_admin: true, "Schedule report delivery";

    OverrideWorkflow => "OVERRIDE_WORKFLOW", Workflow, system_admin: true, "Bypass standard workflow rules";
    EditApprovedQuote => "EDIT_APPROVED_QUOTE", Workflow, system_admin: true, "Modify a quote after approval";
    ReopenClosedJob => "REOPEN_CLOSED_JOB", Workflow, system_admin: true, "Reactivate a completed job";

    UploadDocuments => "UPLOAD_DOCUMENTS", Documents, system_admin: true, "Attach files to RFQs, quotes and jobs";
    DeleteDocuments => "DELETE_DOCUMENTS", Documents, system_admin: true, "Remove uploaded files";
    ViewAllDocuments => "VIEW_ALL_DOCUMENTS", Documents, system_admin: true, "Access all documents";

    ViewEmployeeData => "VIEW_EMPLOYEE_DATA", HumanResources, system_admin: true, "Access employee information";
    ManageEmployees => "MANAGE_EMPLOYEES", HumanResources, system_admin: true, "Add or edit employee records";
    ViewTimesheets => "VIEW_TIMESHEETS", HumanResources, system_admin: true, "Access worker time tracking";
    ApproveTimesheets => "APPROVE_TIMESHEETS", HumanResources, system_admin: true, "Approve submitted timesheets";
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
