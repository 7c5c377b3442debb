//! Storage trait definitions.

use crate::errors::{Result, StorageError};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// Keyed record store split into named column families
///
/// Implemented by [`crate::RocksDbStorage`] for durable deployments and by
/// [`crate::MemoryStorage`] for embedding and tests.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Decoded record under `key`, `None` when absent
    async fn get<K, V>(&self, cf: &str, key: &K) -> Result<Option<V>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned;

    /// Insert or overwrite a record
    async fn put<K, V>(&self, cf: &str, key: &K, value: &V) -> Result<()>
    where
        K: Serialize + Send + Sync,
        V: Serialize + Send + Sync;

    /// Remove a record; absent keys are not an error
    async fn delete<K>(&self, cf: &str, key: &K) -> Result<()>
    where
        K: Serialize + Send + Sync;

    async fn exists<K>(&self, cf: &str, key: &K) -> Result<bool>
    where
        K: Serialize + Send + Sync;

    /// Get all values whose encoded key starts with the encoded prefix
    ///
    /// Results are in encoded-key order. Composite keys are bincode tuples, so
    /// encoding the leading element yields a byte prefix of every key that
    /// shares it.
    async fn get_by_prefix<K, V>(&self, cf: &str, prefix: &K) -> Result<Vec<(Vec<u8>, V)>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned;

    /// Start an empty write batch
    fn batch(&self) -> Box<dyn Batch>;
}

/// Writes staged for a single atomic commit
///
/// Works with pre-serialized bytes to stay object safe; [`BatchExt`] adds the
/// typed helpers. A batch belongs to one task, hence `Send` without `Sync`.
#[async_trait]
pub trait Batch: Send {
    /// Stage an encoded write
    fn put_raw(&mut self, cf: &str, key: Vec<u8>, value: Vec<u8>) -> Result<()>;

    /// Stage an encoded delete
    fn delete_raw(&mut self, cf: &str, key: Vec<u8>) -> Result<()>;

    /// Apply every staged operation or none of them
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Discard staged operations
    fn rollback(self: Box<Self>);
}

/// Typed staging on top of [`Batch`]
pub trait BatchExt: Batch {
    fn put<K, V>(&mut self, cf: &str, key: &K, value: &V) -> Result<()>
    where
        K: Serialize,
        V: Serialize,
    {
        self.put_raw(cf, serialize_key(key)?, serialize_value(value)?)
    }

    fn delete<K>(&mut self, cf: &str, key: &K) -> Result<()>
    where
        K: Serialize,
    {
        self.delete_raw(cf, serialize_key(key)?)
    }
}

impl<T: Batch + ?Sized> BatchExt for T {}

pub(crate) fn serialize_key<K: Serialize>(key: &K) -> Result<Vec<u8>> {
    bincode::serialize(key).map_err(|e| StorageError::Serialization(e.to_string()))
}

pub(crate) fn serialize_value<V: Serialize>(value: &V) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Decode a key returned by [`Storage::get_by_prefix`]
pub fn decode_key<K: DeserializeOwned>(bytes: &[u8]) -> Result<K> {
    bincode::deserialize(bytes).map_err(|e| StorageError::Deserialization(e.to_string()))
}

pub(crate) fn deserialize_value<V: DeserializeOwned>(bytes: &[u8]) -> Result<V> {
    bincode::deserialize(bytes).map_err(|e| StorageError::Deserialization(e.to_string()))
}
