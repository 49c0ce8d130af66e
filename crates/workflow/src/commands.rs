//! Commands and the permissions they require.

use core::fmt;

use serde::{Deserialize, Serialize};

use erha_auth::{CommandAuthorization, Permission};
use erha_core::{DocumentId, DomainError, DomainResult};
use erha_numbering::{NumberFormat, SequenceError, SequenceKey};

/// Documents that receive a human-readable number on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    Rfq,
    Quote,
    Job,
    EmergencyJob,
    Invoice,
}

impl DocumentKind {
    /// Base sequence type, before any year scoping.
    pub fn sequence_base(&self) -> &'static str {
        match self {
            Self::Rfq => "RFQ",
            Self::Quote => "QUOTE",
            Self::Job => "JOB",
            Self::EmergencyJob => "EMERGENCY_JOB",
            Self::Invoice => "INVOICE",
        }
    }

    /// Invoices number continuously; everything else restarts each year.
    pub fn is_yearly(&self) -> bool {
        !matches!(self, Self::Invoice)
    }

    pub fn sequence_key(&self, year: i32) -> Result<SequenceKey, SequenceError> {
        if self.is_yearly() {
            SequenceKey::yearly(self.sequence_base(), year)
        } else {
            SequenceKey::new(self.sequence_base())
        }
    }

    pub fn number_format(&self, year: i32) -> NumberFormat {
        NumberFormat::default_for(self.sequence_base(), year)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sequence_base())
    }
}

/// A command that creates a numbered document.
pub trait NumberedCommand: CommandAuthorization {
    fn kind(&self) -> DocumentKind;

    /// Input checks that run after authorization and before allocation.
    fn validate(&self) -> DomainResult<()> {
        Ok(())
    }
}

macro_rules! requires {
    ($command:ty => [$($permission:ident),+ $(,)?]) => {
        impl CommandAuthorization for $command {
            fn required_permissions(&self) -> &[Permission] {
                &[$(Permission::$permission),+]
            }
        }
    };
}

fn non_blank(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Numbered commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRfq {
    pub client_name: String,
    pub description: String,
}

requires!(CreateRfq => [CreateRfq]);

impl NumberedCommand for CreateRfq {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Rfq
    }

    fn validate(&self) -> DomainResult<()> {
        non_blank("client_name", &self.client_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateQuote {
    /// RFQ the quote answers, if any.
    pub rfq_id: Option<DocumentId>,
    pub client_name: String,
}

requires!(CreateQuote => [CreateQuote]);

impl NumberedCommand for CreateQuote {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Quote
    }

    fn validate(&self) -> DomainResult<()> {
        non_blank("client_name", &self.client_name)
    }
}

/// Open a job from an approved quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateJob {
    pub quote_id: DocumentId,
}

requires!(CreateJob => [CreateJob]);

impl NumberedCommand for CreateJob {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Job
    }
}

/// Emergency jobs skip the quote stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEmergencyJob {
    pub client_name: String,
    pub reason: String,
}

requires!(CreateEmergencyJob => [CreateEmergencyJob]);

impl NumberedCommand for CreateEmergencyJob {
    fn kind(&self) -> DocumentKind {
        DocumentKind::EmergencyJob
    }

    fn validate(&self) -> DomainResult<()> {
        non_blank("client_name", &self.client_name)?;
        non_blank("reason", &self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInvoice {
    pub job_id: DocumentId,
}

requires!(CreateInvoice => [ViewAllJobs, ViewClientFinancials]);

impl NumberedCommand for CreateInvoice {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Invoice
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gated commands (no number allocated)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveQuote {
    pub quote_id: DocumentId,
}

requires!(ApproveQuote => [ApproveQuote]);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviseQuote {
    pub quote_id: DocumentId,
}

requires!(ReviseQuote => [ReviseQuote]);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendQuoteForSignature {
    pub quote_id: DocumentId,
    pub signer_email: String,
}

requires!(SendQuoteForSignature => [SendQuoteDocusign]);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseJob {
    pub job_id: DocumentId,
}

requires!(CloseJob => [CloseJob]);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReopenClosedJob {
    pub job_id: DocumentId,
}

requires!(ReopenClosedJob => [ReopenClosedJob]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yearly_kinds_scope_their_key_by_year() {
        assert_eq!(DocumentKind::Quote.sequence_key(2025).unwrap().as_str(), "QUOTE-2025");
        assert_eq!(
            DocumentKind::EmergencyJob.sequence_key(2026).unwrap().as_str(),
            "EMERGENCY_JOB-2026"
        );
        assert_eq!(DocumentKind::Invoice.sequence_key(2025).unwrap().as_str(), "INVOICE");
    }

    #[test]
    fn number_formats_follow_document_kind() {
        assert_eq!(DocumentKind::Rfq.number_format(2025).format(4), "RFQ-2025-004");
        assert_eq!(DocumentKind::Job.number_format(2024).format(1), "24-001");
        assert_eq!(DocumentKind::Invoice.number_format(2025).format(1), "IN000001");
    }

    #[test]
    fn commands_declare_their_permissions() {
        let approve = ApproveQuote {
            quote_id: DocumentId::new(),
        };
        assert_eq!(approve.required_permissions(), &[Permission::ApproveQuote]);

        let invoice = CreateInvoice {
            job_id: DocumentId::new(),
        };
        assert_eq!(
            invoice.required_permissions(),
            &[Permission::ViewAllJobs, Permission::ViewClientFinancials]
        );
    }

    #[test]
    fn blank_client_is_rejected() {
        let rfq = CreateRfq {
            client_name: "  ".to_string(),
            description: "Pump overhaul".to_string(),
        };
        assert!(matches!(rfq.validate(), Err(DomainError::Validation(_))));

        let emergency = CreateEmergencyJob {
            client_name: "Harbour Mill".to_string(),
            reason: String::new(),
        };
        assert!(emergency.validate().is_err());
    }
}
