use thiserror::Error;

use erha_auth::AuthzError;
use erha_core::DomainError;
use erha_numbering::SequenceError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error(transparent)]
    AuthorizationDenied(#[from] AuthzError),

    /// Numbering could not complete; the caller retries the whole operation.
    #[error("numbering unavailable: {0}")]
    StorageUnavailable(String),

    #[error("validation failed: {0}")]
    Validation(String),

    /// The document's sequence reached its maximum value.
    #[error("sequence exhausted: {0}")]
    SequenceExhausted(String),
}

/// How a caller should react to a [`WorkflowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Permanent for this principal; do not retry.
    Forbidden,
    /// Transient; retry the whole request.
    RetryLater,
    /// The request itself is invalid.
    Rejected,
    /// Needs operator action (e.g. a sequence reset).
    Conflict,
}

impl Disposition {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Forbidden => 403,
            Self::RetryLater => 503,
            Self::Rejected => 400,
            Self::Conflict => 409,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RetryLater)
    }
}

impl WorkflowError {
    pub fn disposition(&self) -> Disposition {
        match self {
            Self::AuthorizationDenied(_) => Disposition::Forbidden,
            Self::StorageUnavailable(_) => Disposition::RetryLater,
            Self::Validation(_) => Disposition::Rejected,
            Self::SequenceExhausted(_) => Disposition::Conflict,
        }
    }
}

impl From<SequenceError> for WorkflowError {
    fn from(err: SequenceError) -> Self {
        match err {
            SequenceError::StorageUnavailable(msg) => Self::StorageUnavailable(msg),
            SequenceError::Exhausted(sequence_type) => Self::SequenceExhausted(sequence_type),
            other @ (SequenceError::InvalidKey(_) | SequenceError::InvalidValue { .. }) => {
                Self::Validation(other.to_string())
            }
        }
    }
}

impl From<DomainError> for WorkflowError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            other @ DomainError::InvalidId(_) => Self::Validation(other.to_string()),
        }
    }
}
