use serde::Serialize;
use tracing::instrument;

use crate::{NumberFormat, SequenceError, SequenceKey, SequenceStore};

/// A value allocated from a sequence together with its rendered form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocatedNumber {
    pub sequence_type: SequenceKey,
    pub value: i64,
    pub formatted: String,
}

/// Allocates monotonically increasing values per named sequence.
///
/// All guarantees (atomicity, per-key isolation, durability, bounded lock
/// wait) come from the store; the generator validates keys, logs, and keeps
/// formatting outside the critical section. It never falls back to a local
/// counter when the store fails.
#[derive(Debug, Clone)]
pub struct SequenceGenerator<S> {
    store: S,
}

impl<S> SequenceGenerator<S>
where
    S: SequenceStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Allocate the next value of `sequence_type`. The first call for an
    /// unseen type returns 1.
    pub async fn next_value(&self, sequence_type: &str) -> Result<i64, SequenceError> {
        let key = SequenceKey::new(sequence_type)?;
        self.next_value_for(&key).await
    }

    #[instrument(skip(self, key), fields(sequence_type = %key), err)]
    pub async fn next_value_for(&self, key: &SequenceKey) -> Result<i64, SequenceError> {
        let value = self.store.increment(key).await?;
        tracing::debug!(value, "allocated sequence value");
        Ok(value)
    }

    /// Allocate, then render with `format`.
    pub async fn next_number(
        &self,
        key: &SequenceKey,
        format: &NumberFormat,
    ) -> Result<AllocatedNumber, SequenceError> {
        let value = self.next_value_for(key).await?;
        Ok(AllocatedNumber {
            sequence_type: key.clone(),
            value,
            formatted: format.format(value),
        })
    }

    /// Last allocated value without allocating; 0 for an unseen type.
    pub async fn current_value(&self, sequence_type: &str) -> Result<i64, SequenceError> {
        let key = SequenceKey::new(sequence_type)?;
        Ok(self
            .store
            .load(&key)
            .await?
            .map(|c| c.current_value)
            .unwrap_or(0))
    }

    /// Administrative reset: the next allocation returns `value + 1`.
    #[instrument(skip(self), err)]
    pub async fn reset(&self, sequence_type: &str, value: i64) -> Result<(), SequenceError> {
        let key = SequenceKey::new(sequence_type)?;
        if value < 0 {
            return Err(SequenceError::InvalidValue {
                sequence_type: key.to_string(),
                value,
            });
        }
        self.store.reset(&key, value).await?;
        tracing::info!(sequence_type = %key, value, "sequence reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::{InMemorySequenceStore, SequenceCounter};

    /// Store whose backend is never reachable.
    struct UnreachableStore;

    #[async_trait]
    impl SequenceStore for UnreachableStore {
        async fn increment(&self, _key: &SequenceKey) -> Result<i64, SequenceError> {
            Err(SequenceError::storage("connection refused"))
        }

        async fn load(&self, _key: &SequenceKey) -> Result<Option<SequenceCounter>, SequenceError> {
            Err(SequenceError::storage("connection refused"))
        }

        async fn reset(&self, _key: &SequenceKey, _value: i64) -> Result<(), SequenceError> {
            Err(SequenceError::storage("connection refused"))
        }
    }

    #[tokio::test]
    async fn fresh_job_sequence_formats_as_first_number() {
        let generator = SequenceGenerator::new(InMemorySequenceStore::new());
        let key = SequenceKey::new("JOB-2025").unwrap();

        let allocated = generator
            .next_number(&key, &NumberFormat::new("24-", 3))
            .await
            .unwrap();

        assert_eq!(allocated.value, 1);
        assert_eq!(allocated.formatted, "24-001");
    }

    #[tokio::test]
    async fn empty_sequence_type_is_rejected() {
        let generator = SequenceGenerator::new(InMemorySequenceStore::new());
        assert!(matches!(
            generator.next_value("  ").await,
            Err(SequenceError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn names_with_spaces_or_long_names_are_allocated() {
        let generator = SequenceGenerator::new(InMemorySequenceStore::new());
        assert_eq!(generator.next_value("JOB 2025").await.unwrap(), 1);
        assert_eq!(generator.next_value(&"Q".repeat(65)).await.unwrap(), 1);
        assert_eq!(generator.next_value(" JOB 2025 ").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn storage_failure_is_propagated_not_papered_over() {
        let generator = SequenceGenerator::new(UnreachableStore);

        for _ in 0..3 {
            let err = generator.next_value("QUOTE").await.unwrap_err();
            assert!(matches!(err, SequenceError::StorageUnavailable(_)));
        }
        assert!(generator.current_value("QUOTE").await.is_err());
    }

    #[tokio::test]
    async fn current_value_peeks_without_allocating() {
        let generator = SequenceGenerator::new(InMemorySequenceStore::new());
        assert_eq!(generator.current_value("RFQ-2025").await.unwrap(), 0);

        generator.next_value("RFQ-2025").await.unwrap();
        generator.next_value("RFQ-2025").await.unwrap();
        assert_eq!(generator.current_value("RFQ-2025").await.unwrap(), 2);
        assert_eq!(generator.current_value("RFQ-2025").await.unwrap(), 2);
        assert_eq!(generator.next_value("RFQ-2025").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn reset_moves_the_next_allocation() {
        let generator = SequenceGenerator::new(InMemorySequenceStore::new());
        generator.reset("INVOICE", 500).await.unwrap();
        assert_eq!(generator.next_value("INVOICE").await.unwrap(), 501);

        assert!(matches!(
            generator.reset("INVOICE", -1).await,
            Err(SequenceError::InvalidValue { value: -1, .. })
        ));
        assert_eq!(generator.current_value("INVOICE").await.unwrap(), 501);
    }
}
