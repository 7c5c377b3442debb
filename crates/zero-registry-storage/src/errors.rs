//! Storage error types.

use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The engine rejected a read, write or open
    #[error("Database error: {0}")]
    Database(String),

    /// A key or record could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stored bytes do not decode as the requested type
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Column family is not one of the registry collections
    #[error("Invalid column family: {0}")]
    InvalidColumnFamily(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<rocksdb::Error> for StorageError {
    fn from(err: rocksdb::Error) -> Self {
        StorageError::Database(err.into_string())
    }
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
