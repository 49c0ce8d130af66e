//! Document workflow: authorize a command, then allocate its number.
//!
//! Authorization always runs before any side effect, so a denied request never
//! consumes a sequence value.

pub mod commands;
pub mod error;
pub mod service;

pub use commands::{
    ApproveQuote, CloseJob, CreateEmergencyJob, CreateInvoice, CreateJob, CreateQuote, CreateRfq,
    DocumentKind, NumberedCommand, ReopenClosedJob, ReviseQuote, SendQuoteForSignature,
};
pub use error::{Disposition, WorkflowError};
pub use service::{DocumentService, NumberedDocument};
