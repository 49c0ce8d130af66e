//! Postgres-backed sequence store.
//!
//! Counters live in `numbering_sequences` (see
//! `migrations/0001_numbering_sequences.sql`), one row per sequence type.
//!
//! ## Increment
//!
//! Each increment runs in its own short transaction, independent of any
//! caller transaction:
//!
//! 1. `set_config('lock_timeout', …, true)` bounds the row-lock wait
//! 2. `INSERT … ON CONFLICT DO NOTHING` creates an unseen key at 0
//! 3. `SELECT … FOR UPDATE` locks the row
//! 4. `UPDATE` writes `current_value + 1`
//! 5. `COMMIT` releases the lock
//!
//! Any failure drops the transaction, which rolls back and releases the lock.
//! A value is only returned after the commit succeeds, so a failed commit can
//! leave a gap but never a duplicate.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | SequenceError | Scenario |
//! |------------|----------------------|---------------|----------|
//! | Database | `55P03` | `StorageUnavailable` | Row lock not acquired within `lock_timeout` |
//! | Database | `57014` | `StorageUnavailable` | Statement cancelled |
//! | Database | `23514` | `StorageUnavailable` | Check constraint rejected the row |
//! | Database (other) | Any other | `StorageUnavailable` | Other database errors |
//! | PoolTimedOut | N/A | `StorageUnavailable` | No pooled connection within the acquire timeout |
//! | PoolClosed | N/A | `StorageUnavailable` | Pool shut down |
//! | Io / Tls / other | N/A | `StorageUnavailable` | Network and connection failures |

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction};
use tracing::instrument;

use erha_numbering::{SequenceCounter, SequenceError, SequenceKey, SequenceStore};

use crate::config::DatabaseConfig;

const SCHEMA: &str = include_str!("../../migrations/0001_numbering_sequences.sql");

/// Sequence store over a Postgres connection pool.
///
/// `Send + Sync` and cheap to clone; every clone shares the pool.
#[derive(Debug, Clone)]
pub struct PostgresSequenceStore {
    pool: Arc<PgPool>,
    lock_timeout: Duration,
}

impl PostgresSequenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
            lock_timeout: DatabaseConfig::DEFAULT_LOCK_TIMEOUT,
        }
    }

    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    /// Open a pool sized and bounded by `config`.
    #[instrument(skip(config), fields(max_connections = config.max_connections), err)]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, SequenceError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool).with_lock_timeout(config.lock_timeout))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create `numbering_sequences` if it does not exist.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), SequenceError> {
        sqlx::raw_sql(SCHEMA)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    async fn begin_bounded(&self) -> Result<Transaction<'static, Postgres>, SequenceError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        // Transaction-local; reverts on commit or rollback.
        sqlx::query("SELECT set_config('lock_timeout', $1, true)")
            .bind(lock_timeout_setting(self.lock_timeout))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("set_lock_timeout", e))?;

        Ok(tx)
    }
}

#[async_trait]
impl SequenceStore for PostgresSequenceStore {
    #[instrument(skip(self, key), fields(sequence_type = %key), err)]
    async fn increment(&self, key: &SequenceKey) -> Result<i64, SequenceError> {
        let mut tx = self.begin_bounded().await?;

        sqlx::query(
            r#"
            INSERT INTO numbering_sequences (sequence_type, current_value, updated_at)
            VALUES ($1, 0, NOW())
            ON CONFLICT (sequence_type) DO NOTHING
            "#,
        )
        .bind(key.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("create_sequence", e))?;

        let current: i64 = sqlx::query(
            r#"
            SELECT current_value
            FROM numbering_sequences
            WHERE sequence_type = $1
            FOR UPDATE
            "#,
        )
        .bind(key.as_str())
        .fetch_one(&mut *tx)
        .await
        .and_then(|row| row.try_get("current_value"))
        .map_err(|e| map_sqlx_error("lock_sequence", e))?;

        let next = current
            .checked_add(1)
            .ok_or_else(|| SequenceError::Exhausted(key.to_string()))?;

        sqlx::query(
            r#"
            UPDATE numbering_sequences
            SET current_value = $2, updated_at = NOW()
            WHERE sequence_type = $1
            "#,
        )
        .bind(key.as_str())
        .bind(next)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_sequence", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(next)
    }

    #[instrument(skip(self, key), fields(sequence_type = %key), err)]
    async fn load(&self, key: &SequenceKey) -> Result<Option<SequenceCounter>, SequenceError> {
        let row: Option<SequenceRow> = sqlx::query_as(
            r#"
            SELECT sequence_type, current_value, updated_at
            FROM numbering_sequences
            WHERE sequence_type = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error("load_sequence", e))?;

        row.map(SequenceRow::into_counter).transpose()
    }

    #[instrument(skip(self, key), fields(sequence_type = %key), err)]
    async fn reset(&self, key: &SequenceKey, value: i64) -> Result<(), SequenceError> {
        if value < 0 {
            return Err(SequenceError::InvalidValue {
                sequence_type: key.to_string(),
                value,
            });
        }

        let mut tx = self.begin_bounded().await?;

        sqlx::query(
            r#"
            INSERT INTO numbering_sequences (sequence_type, current_value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (sequence_type)
            DO UPDATE SET current_value = EXCLUDED.current_value, updated_at = NOW()
            "#,
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("reset_sequence", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(())
    }
}

/// `lock_timeout` value for a wait bound. Rounds up to whole milliseconds
/// and never yields `0ms`, which Postgres treats as "wait forever".
fn lock_timeout_setting(timeout: Duration) -> String {
    let millis = timeout.as_nanos().div_ceil(1_000_000).max(1);
    format!("{millis}ms")
}

/// Map SQLx errors to SequenceError.
///
/// Every storage-side failure is retryable from the caller's point of view.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> SequenceError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = match db_err.code().as_deref() {
                Some("55P03") => format!("lock wait exceeded in {operation}"),
                Some("57014") => format!("statement cancelled in {operation}"),
                Some("23514") => {
                    format!("constraint rejected row in {operation}: {}", db_err.message())
                }
                _ => format!("database error in {operation}: {}", db_err.message()),
            };
            SequenceError::StorageUnavailable(msg)
        }
        sqlx::Error::PoolTimedOut => {
            SequenceError::storage(format!("no connection available in {operation}"))
        }
        sqlx::Error::PoolClosed => {
            SequenceError::storage(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::RowNotFound => {
            // The row is created in the same transaction before it is locked.
            SequenceError::storage(format!("unexpected row not found in {operation}"))
        }
        other => SequenceError::storage(format!("sqlx error in {operation}: {other}")),
    }
}

// SQLx row types

#[derive(Debug)]
struct SequenceRow {
    sequence_type: String,
    current_value: i64,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for SequenceRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            sequence_type: row.try_get("sequence_type")?,
            current_value: row.try_get("current_value")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl SequenceRow {
    fn into_counter(self) -> Result<SequenceCounter, SequenceError> {
        Ok(SequenceCounter {
            sequence_type: SequenceKey::new(&self.sequence_type)?,
            current_value: self.current_value,
            updated_at: self.updated_at,
        })
    }
}
