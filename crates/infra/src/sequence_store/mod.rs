//! Durable sequence counters.

mod postgres;

pub use postgres::PostgresSequenceStore;
