use thiserror::Error;

/// Sequence allocation error.
///
/// An unseen sequence type is *not* an error: first use creates it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// The sequence key was empty or malformed.
    #[error("invalid sequence key: {0}")]
    InvalidKey(String),

    /// A reset value was out of range.
    #[error("invalid sequence value {value} for '{sequence_type}'")]
    InvalidValue { sequence_type: String, value: i64 },

    /// The counter reached the maximum representable value.
    #[error("sequence '{0}' is exhausted")]
    Exhausted(String),

    /// The durable store could not be reached, the lock could not be taken
    /// within the bounded wait, or the increment could not be committed.
    /// Callers retry the whole create operation.
    #[error("sequence storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl SequenceError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    /// Whether retrying the operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}
