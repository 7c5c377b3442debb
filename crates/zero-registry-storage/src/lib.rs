//! # zero-registry-storage
//!
//! Storage abstraction layer for the identity registry.
//!
//! Records live in named column families and are addressed by bincode-encoded
//! keys. Multi-record mutations go through a [`Batch`] so that a store write
//! and its activity-log entry land together or not at all.

#![warn(clippy::all)]

pub mod column_families;
pub mod errors;
pub mod memory_impl;
pub mod rocksdb_impl;
pub mod traits;

pub use column_families::*;
pub use errors::{Result, StorageError};
pub use memory_impl::MemoryStorage;
pub use rocksdb_impl::RocksDbStorage;
pub use traits::{decode_key, Batch, BatchExt, Storage};
