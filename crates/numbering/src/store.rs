use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{SequenceError, SequenceKey};

/// Last allocated value of one named sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceCounter {
    pub sequence_type: SequenceKey,
    pub current_value: i64,
    pub updated_at: DateTime<Utc>,
}

/// Durable home of sequence counters.
///
/// ## Implementation Requirements
///
/// - `increment` is one atomic read-increment-write per key: concurrent calls
///   on the same key never return the same value; calls on different keys do
///   not contend.
/// - The per-key lock is taken with a bounded wait and released on every exit
///   path. Exceeding the wait is `StorageUnavailable`.
/// - An unseen key is created at 0, so its first increment returns 1.
/// - The increment is committed before it is returned, independently of any
///   caller transaction. Gaps are acceptable, duplicates are not.
/// - `reset` only accepts `value >= 0`; a negative value is `InvalidValue`
///   and leaves the counter untouched, so no increment ever returns a value
///   below 1.
#[async_trait]
pub trait SequenceStore: Send + Sync {
    /// Atomically increment and return the new value.
    async fn increment(&self, key: &SequenceKey) -> Result<i64, SequenceError>;

    /// Read the counter without allocating. `None` for an unseen key.
    async fn load(&self, key: &SequenceKey) -> Result<Option<SequenceCounter>, SequenceError>;

    /// Set the counter so the next increment returns `value + 1`.
    async fn reset(&self, key: &SequenceKey, value: i64) -> Result<(), SequenceError>;
}

#[async_trait]
impl<S> SequenceStore for Arc<S>
where
    S: SequenceStore + ?Sized,
{
    async fn increment(&self, key: &SequenceKey) -> Result<i64, SequenceError> {
        (**self).increment(key).await
    }

    async fn load(&self, key: &SequenceKey) -> Result<Option<SequenceCounter>, SequenceError> {
        (**self).load(key).await
    }

    async fn reset(&self, key: &SequenceKey, value: i64) -> Result<(), SequenceError> {
        (**self).reset(key, value).await
    }
}
