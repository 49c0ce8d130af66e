//! Infrastructure layer: Postgres adapters and configuration.

pub mod config;
pub mod sequence_store;

use anyhow::Context;

pub use config::{ConfigError, DatabaseConfig};
pub use sequence_store::PostgresSequenceStore;

/// Process bootstrap: read [`DatabaseConfig`] from the environment, connect,
/// and make sure the counter table exists.
pub async fn connect_sequence_store_from_env() -> anyhow::Result<PostgresSequenceStore> {
    let config = DatabaseConfig::from_env().context("loading database configuration")?;
    tracing::info!(config = ?config, "connecting sequence store");

    let store = PostgresSequenceStore::connect(&config)
        .await
        .context("connecting to Postgres")?;
    store
        .ensure_schema()
        .await
        .context("creating numbering_sequences")?;
    Ok(store)
}
