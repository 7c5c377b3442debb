//! RocksDB storage implementation.

use crate::{
    column_families::all_column_families,
    errors::{Result, StorageError},
    traits::{deserialize_value, serialize_key, serialize_value, Batch, Storage},
};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, Direction, IteratorMode, Options, WriteBatch, DB};
use serde::{de::DeserializeOwned, Serialize};
use std::{path::Path, sync::Arc};
use tempfile::TempDir;
use tracing::debug;

/// Durable storage: one RocksDB instance, one column family per registry
/// collection
pub struct RocksDbStorage {
    db: Arc<DB>,
    // Scratch directory owned by `open_test` handles
    _temp_dir: Option<TempDir>,
}

fn column_family<'a>(db: &'a DB, cf: &str) -> Result<&'a ColumnFamily> {
    db.cf_handle(cf)
        .ok_or_else(|| StorageError::InvalidColumnFamily(cf.to_string()))
}

impl RocksDbStorage {
    /// Open (or create) the database at `path` with every registry column family
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = DB::open_cf(&opts, path, all_column_families())?;
        debug!(path = %path.display(), "RocksDB opened");

        Ok(Self {
            db: Arc::new(db),
            _temp_dir: None,
        })
    }

    /// Open a database in a fresh temporary directory, removed on drop
    pub fn open_test() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let storage = Self::open(temp_dir.path())?;
        Ok(Self {
            _temp_dir: Some(temp_dir),
            ..storage
        })
    }

    fn encoded_key<K: Serialize>(&self, cf: &str, key: &K) -> Result<(&ColumnFamily, Vec<u8>)> {
        Ok((column_family(&self.db, cf)?, serialize_key(key)?))
    }
}

#[async_trait]
impl Storage for RocksDbStorage {
    async fn get<K, V>(&self, cf: &str, key: &K) -> Result<Option<V>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned,
    {
        let (handle, key) = self.encoded_key(cf, key)?;
        self.db
            .get_pinned_cf(handle, key)?
            .map(|bytes| deserialize_value(&bytes))
            .transpose()
    }

    async fn put<K, V>(&self, cf: &str, key: &K, value: &V) -> Result<()>
    where
        K: Serialize + Send + Sync,
        V: Serialize + Send + Sync,
    {
        let (handle, key) = self.encoded_key(cf, key)?;
        self.db.put_cf(handle, key, serialize_value(value)?)?;
        Ok(())
    }

    async fn delete<K>(&self, cf: &str, key: &K) -> Result<()>
    where
        K: Serialize + Send + Sync,
    {
        let (handle, key) = self.encoded_key(cf, key)?;
        self.db.delete_cf(handle, key)?;
        Ok(())
    }

    async fn exists<K>(&self, cf: &str, key: &K) -> Result<bool>
    where
        K: Serialize + Send + Sync,
    {
        let (handle, key) = self.encoded_key(cf, key)?;
        Ok(self.db.get_pinned_cf(handle, key)?.is_some())
    }

    async fn get_by_prefix<K, V>(&self, cf: &str, prefix: &K) -> Result<Vec<(Vec<u8>, V)>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned,
    {
        let (handle, prefix) = self.encoded_key(cf, prefix)?;

        // No prefix extractor is configured; seek and stop at the first foreign key
        let mut rows = Vec::new();
        for item in self
            .db
            .iterator_cf(handle, IteratorMode::From(&prefix, Direction::Forward))
        {
            let (key, value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            rows.push((key.into_vec(), deserialize_value(&value)?));
        }

        Ok(rows)
    }

    fn batch(&self) -> Box<dyn Batch> {
        Box::new(RocksDbBatch {
            db: Arc::clone(&self.db),
            write_batch: WriteBatch::default(),
        })
    }
}

/// Pending writes applied by a single `DB::write`
pub struct RocksDbBatch {
    db: Arc<DB>,
    write_batch: WriteBatch,
}

#[async_trait]
impl Batch for RocksDbBatch {
    fn put_raw(&mut self, cf: &str, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        let handle = column_family(&self.db, cf)?;
        self.write_batch.put_cf(handle, key, value);
        Ok(())
    }

    fn delete_raw(&mut self, cf: &str, key: Vec<u8>) -> Result<()> {
        let handle = column_family(&self.db, cf)?;
        self.write_batch.delete_cf(handle, key);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let RocksDbBatch { db, write_batch } = *self;
        let ops = write_batch.len();
        db.write(write_batch)?;
        debug!(ops, "Batch committed");
        Ok(())
    }

    fn rollback(self: Box<Self>) {
        debug!(ops = self.write_batch.len(), "Batch discarded");
    }
}
