//! `erha-numbering` — durable, concurrency-safe document numbering.
//!
//! A [`SequenceGenerator`] allocates the next integer of a named sequence
//! through a [`SequenceStore`]; a [`NumberFormat`] turns it into a document
//! number such as `QUO-2025-00001`. Only the allocation is serialized.

pub mod error;
pub mod format;
pub mod generator;
pub mod in_memory;
pub mod key;
pub mod store;

pub use error::SequenceError;
pub use format::NumberFormat;
pub use generator::{AllocatedNumber, SequenceGenerator};
pub use in_memory::InMemorySequenceStore;
pub use key::SequenceKey;
pub use store::{SequenceCounter, SequenceStore};
