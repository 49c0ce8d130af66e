use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::{SequenceCounter, SequenceError, SequenceKey, SequenceStore};

/// Default bounded wait for a per-key lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

type Slot = Arc<Mutex<SequenceCounter>>;

/// In-memory sequence store with one async mutex per key.
///
/// Intended for tests/dev: counters do not survive a restart. The outer map
/// lock is only held to find or insert a slot, never across an await.
#[derive(Debug)]
pub struct InMemorySequenceStore {
    slots: RwLock<HashMap<SequenceKey, Slot>>,
    lock_timeout: Duration,
}

impl InMemorySequenceStore {
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            lock_timeout,
        }
    }

    fn slot(&self, key: &SequenceKey) -> Result<Slot, SequenceError> {
        if let Some(slot) = self
            .slots
            .read()
            .map_err(|_| SequenceError::storage("lock poisoned"))?
            .get(key)
        {
            return Ok(slot.clone());
        }

        let mut slots = self
            .slots
            .write()
            .map_err(|_| SequenceError::storage("lock poisoned"))?;
        let slot = slots.entry(key.clone()).or_insert_with(|| {
            Arc::new(Mutex::new(SequenceCounter {
                sequence_type: key.clone(),
                current_value: 0,
                updated_at: Utc::now(),
            }))
        });
        Ok(slot.clone())
    }

    fn existing_slot(&self, key: &SequenceKey) -> Result<Option<Slot>, SequenceError> {
        let slots = self
            .slots
            .read()
            .map_err(|_| SequenceError::storage("lock poisoned"))?;
        Ok(slots.get(key).cloned())
    }

    async fn lock<'a>(
        &self,
        key: &SequenceKey,
        slot: &'a Slot,
    ) -> Result<tokio::sync::MutexGuard<'a, SequenceCounter>, SequenceError> {
        tokio::time::timeout(self.lock_timeout, slot.lock())
            .await
            .map_err(|_| {
                SequenceError::storage(format!(
                    "timed out after {:?} waiting for lock on '{key}'",
                    self.lock_timeout
                ))
            })
    }
}

impl Default for InMemorySequenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SequenceStore for InMemorySequenceStore {
    async fn increment(&self, key: &SequenceKey) -> Result<i64, SequenceError> {
        let slot = self.slot(key)?;
        let mut counter = self.lock(key, &slot).await?;

        let next = counter
            .current_value
            .checked_add(1)
            .ok_or_else(|| SequenceError::Exhausted(key.to_string()))?;
        counter.current_value = next;
        counter.updated_at = Utc::now();
        Ok(next)
    }

    async fn load(&self, key: &SequenceKey) -> Result<Option<SequenceCounter>, SequenceError> {
        match self.existing_slot(key)? {
            Some(slot) => {
                let counter = self.lock(key, &slot).await?.clone();
                Ok(Some(counter))
            }
            None => Ok(None),
        }
    }

    async fn reset(&self, key: &SequenceKey, value: i64) -> Result<(), SequenceError> {
        if value < 0 {
            return Err(SequenceError::InvalidValue {
                sequence_type: key.to_string(),
                value,
            });
        }
        let slot = self.slot(key)?;
        let mut counter = self.lock(key, &slot).await?;
        counter.current_value = value;
        counter.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> SequenceKey {
        SequenceKey::new(s).unwrap()
    }

    #[tokio::test]
    async fn first_increment_returns_one() {
        let store = InMemorySequenceStore::new();
        assert_eq!(store.increment(&key("JOB-2025")).await.unwrap(), 1);
        assert_eq!(store.increment(&key("JOB-2025")).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn load_does_not_create_or_allocate() {
        let store = InMemorySequenceStore::new();
        assert!(store.load(&key("RFQ")).await.unwrap().is_none());

        store.increment(&key("RFQ")).await.unwrap();
        let counter = store.load(&key("RFQ")).await.unwrap().unwrap();
        assert_eq!(counter.current_value, 1);
        assert_eq!(store.increment(&key("RFQ")).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn held_lock_times_out_as_storage_unavailable() {
        let store = InMemorySequenceStore::with_lock_timeout(Duration::from_millis(20));
        let k = key("QUOTE");
        let slot = store.slot(&k).unwrap();
        let _held = slot.lock().await;

        let err = store.increment(&k).await.unwrap_err();
        assert!(matches!(err, SequenceError::StorageUnavailable(_)));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn held_lock_on_one_key_does_not_block_another() {
        let store = InMemorySequenceStore::with_lock_timeout(Duration::from_millis(20));
        let quote = key("QUOTE");
        let slot = store.slot(&quote).unwrap();
        let _held = slot.lock().await;

        assert_eq!(store.increment(&key("JOB")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn exhausted_counter_is_reported() {
        let store = InMemorySequenceStore::new();
        let k = key("INVOICE");
        store.reset(&k, i64::MAX).await.unwrap();
        assert_eq!(
            store.increment(&k).await.unwrap_err(),
            SequenceError::Exhausted("INVOICE".to_string())
        );
    }

    #[tokio::test]
    async fn negative_reset_is_rejected_and_leaves_the_counter_alone() {
        let store = InMemorySequenceStore::new();
        let k = key("QUOTE");
        store.increment(&k).await.unwrap();

        assert_eq!(
            store.reset(&k, -5).await,
            Err(SequenceError::InvalidValue {
                sequence_type: "QUOTE".to_string(),
                value: -5,
            })
        );
        assert_eq!(store.increment(&k).await.unwrap(), 2);

        // A rejected reset does not create an unseen key either.
        assert!(store.reset(&key("RFQ"), -1).await.is_err());
        assert!(store.load(&key("RFQ")).await.unwrap().is_none());
    }
}
