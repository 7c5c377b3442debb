//! In-memory storage implementation.
//!
//! Column families are ordered maps of encoded key to encoded value, so prefix
//! scans and key ordering match the RocksDB backend. Batches are applied under
//! a single write lock, which makes them atomic with respect to every reader.

use crate::{
    column_families::all_column_families,
    errors::{Result, StorageError},
    traits::{deserialize_value, serialize_key, serialize_value, Batch, Storage},
};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

type ColumnFamily = BTreeMap<Vec<u8>, Vec<u8>>;
type ColumnFamilies = HashMap<String, ColumnFamily>;

/// Non-persistent storage backend
#[derive(Clone)]
pub struct MemoryStorage {
    cfs: Arc<RwLock<ColumnFamilies>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    /// Create an empty store with every registry column family
    pub fn new() -> Self {
        let cfs = all_column_families()
            .into_iter()
            .map(|cf| (cf.to_string(), ColumnFamily::new()))
            .collect();

        Self {
            cfs: Arc::new(RwLock::new(cfs)),
        }
    }

    /// Number of records held in a column family
    pub async fn len(&self, cf: &str) -> Result<usize> {
        let cfs = self.cfs.read().await;
        cfs.get(cf)
            .map(BTreeMap::len)
            .ok_or_else(|| StorageError::InvalidColumnFamily(cf.to_string()))
    }
}

fn ensure_known(cf: &str) -> Result<()> {
    if all_column_families().iter().any(|known| *known == cf) {
        Ok(())
    } else {
        Err(StorageError::InvalidColumnFamily(cf.to_string()))
    }
}

fn column<'a>(cfs: &'a ColumnFamilies, cf: &str) -> Result<&'a ColumnFamily> {
    cfs.get(cf)
        .ok_or_else(|| StorageError::InvalidColumnFamily(cf.to_string()))
}

fn column_mut<'a>(cfs: &'a mut ColumnFamilies, cf: &str) -> Result<&'a mut ColumnFamily> {
    cfs.get_mut(cf)
        .ok_or_else(|| StorageError::InvalidColumnFamily(cf.to_string()))
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get<K, V>(&self, cf: &str, key: &K) -> Result<Option<V>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned,
    {
        let key_bytes = serialize_key(key)?;
        let cfs = self.cfs.read().await;

        match column(&cfs, cf)?.get(&key_bytes) {
            Some(bytes) => Ok(Some(deserialize_value(bytes)?)),
            None => Ok(None),
        }
    }

    async fn put<K, V>(&self, cf: &str, key: &K, value: &V) -> Result<()>
    where
        K: Serialize + Send + Sync,
        V: Serialize + Send + Sync,
    {
        let key_bytes = serialize_key(key)?;
        let value_bytes = serialize_value(value)?;
        let mut cfs = self.cfs.write().await;

        column_mut(&mut cfs, cf)?.insert(key_bytes, value_bytes);
        Ok(())
    }

    async fn delete<K>(&self, cf: &str, key: &K) -> Result<()>
    where
        K: Serialize + Send + Sync,
    {
        let key_bytes = serialize_key(key)?;
        let mut cfs = self.cfs.write().await;

        column_mut(&mut cfs, cf)?.remove(&key_bytes);
        Ok(())
    }

    async fn exists<K>(&self, cf: &str, key: &K) -> Result<bool>
    where
        K: Serialize + Send + Sync,
    {
        let key_bytes = serialize_key(key)?;
        let cfs = self.cfs.read().await;

        Ok(column(&cfs, cf)?.contains_key(&key_bytes))
    }

    async fn get_by_prefix<K, V>(&self, cf: &str, prefix: &K) -> Result<Vec<(Vec<u8>, V)>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned,
    {
        let prefix_bytes = serialize_key(prefix)?;
        let cfs = self.cfs.read().await;

        column(&cfs, cf)?
            .range(prefix_bytes.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix_bytes))
            .map(|(key, value)| Ok((key.clone(), deserialize_value(value)?)))
            .collect()
    }

    fn batch(&self) -> Box<dyn Batch> {
        Box::new(MemoryBatch {
            cfs: Arc::clone(&self.cfs),
            ops: Vec::new(),
        })
    }
}

enum BatchOp {
    Put {
        cf: String,
        key: Vec<u8>,
        value: Vec<u8>,
    },
    Delete {
        cf: String,
        key: Vec<u8>,
    },
}

/// In-memory batch; buffers operations until commit
pub struct MemoryBatch {
    cfs: Arc<RwLock<ColumnFamilies>>,
    ops: Vec<BatchOp>,
}

#[async_trait]
impl Batch for MemoryBatch {
    fn put_raw(&mut self, cf: &str, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        ensure_known(cf)?;
        self.ops.push(BatchOp::Put {
            cf: cf.to_string(),
            key,
            value,
        });
        Ok(())
    }

    fn delete_raw(&mut self, cf: &str, key: Vec<u8>) -> Result<()> {
        ensure_known(cf)?;
        self.ops.push(BatchOp::Delete {
            cf: cf.to_string(),
            key,
        });
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryBatch { cfs, ops } = *self;
        let count = ops.len();
        let mut cfs = cfs.write().await;

        for op in ops {
            match op {
                BatchOp::Put { cf, key, value } => {
                    column_mut(&mut cfs, &cf)?.insert(key, value);
                }
                BatchOp::Delete { cf, key } => {
                    column_mut(&mut cfs, &cf)?.remove(&key);
                }
            }
        }

        debug!(ops = count, "Memory batch committed");
        Ok(())
    }

    fn rollback(self: Box<Self>) {
        debug!(ops = self.ops.len(), "Memory batch rolled back");
    }
}
