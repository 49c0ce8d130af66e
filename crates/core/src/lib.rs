//! `erha-core` — shared domain primitives for the operations backend.
//!
//! Error and identifier types only; no IO.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::DocumentId;
