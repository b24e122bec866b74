//! dealbase core - the entity store.
//!
//! A small sled-backed store with one tree per entity kind, big-endian u64
//! record keys, and atomic per-kind id allocation. Rows are opaque bytes;
//! the typed encoding lives in the protocol crate.

pub mod error;
pub mod storage;

pub use error::Error;
pub use storage::{EntityKind, RecordKey, StorageConfig, StorageEngine};
