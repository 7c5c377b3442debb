//! Registry error types.

use crate::types::AccountId;
use thiserror::Error;
use zero_registry_storage::StorageError;

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Caller already holds an active identity
    #[error("Identity already registered: {0}")]
    IdentityExists(AccountId),

    /// Caller, owner, delegate or backup target is not registered
    #[error("Identity not found: {0}")]
    IdentityNotFound(AccountId),

    /// Verifier is not a registered identity
    #[error("Unauthorized verifier: {0}")]
    UnauthorizedVerifier(AccountId),

    /// No attribute stored under (owner, name)
    #[error("Attribute not found: owner={owner}, name={name}")]
    AttributeNotFound { owner: AccountId, name: String },

    /// Delegate is not registered, or no delegation exists for the pair
    #[error("Delegate not found: {0}")]
    DelegateNotFound(AccountId),

    /// A length or size bound was violated
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Logical time source unavailable
    #[error("Clock unavailable: {0}")]
    ClockUnavailable(String),

    /// Activity event could not be delivered
    #[error("Event publication failed: {0}")]
    Publish(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Error taxonomy shared by every registry operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    IdentityExists,
    IdentityNotFound,
    AttributeNotFound,
    DelegateNotFound,
    InvalidInput,
    SystemFailure,
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::IdentityExists(_) => ErrorKind::IdentityExists,
            RegistryError::IdentityNotFound(_) => ErrorKind::IdentityNotFound,
            RegistryError::UnauthorizedVerifier(_) => ErrorKind::Unauthorized,
            RegistryError::AttributeNotFound { .. } => ErrorKind::AttributeNotFound,
            RegistryError::DelegateNotFound(_) => ErrorKind::DelegateNotFound,
            RegistryError::InvalidInput { .. } => ErrorKind::InvalidInput,
            RegistryError::ClockUnavailable(_)
            | RegistryError::Publish(_)
            | RegistryError::Storage(_) => ErrorKind::SystemFailure,
        }
    }

    /// Only systemic failures may succeed on retry; every other kind is
    /// permanent until registry state changes.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::SystemFailure
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
