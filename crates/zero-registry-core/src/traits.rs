//! Registry trait definitions.

use crate::{errors::Result, types::*};
use async_trait::async_trait;

/// Receives activity entries after their operation has committed
///
/// Injected into the registry so that downstream consumers (audit sinks,
/// caches) can follow the trail without polling storage.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a committed activity entry
    async fn publish(&self, entry: ActivityLogEntry) -> Result<()>;
}

/// Publisher that drops every entry
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _entry: ActivityLogEntry) -> Result<()> {
        Ok(())
    }
}

/// Identity registry operations
///
/// Mutating operations validate every precondition before writing, and write
/// the record change together with one activity entry. Read operations treat
/// absent records as defaults; they only fail on storage or clock failure.
#[async_trait]
pub trait IdentityRegistry: Send + Sync {
    // ========================================================================
    // Identities
    // ========================================================================

    /// Register the caller with a display name
    async fn register(&self, ctx: &CallerContext, display_name: String) -> Result<Identity>;

    /// Replace the caller's display name
    async fn update_display_name(
        &self,
        ctx: &CallerContext,
        display_name: String,
    ) -> Result<Identity>;

    /// Point the caller's identity at a registered backup account
    async fn set_backup_address(&self, ctx: &CallerContext, backup: AccountId) -> Result<Identity>;

    /// Stored identity, or the zero-value identity if absent
    async fn get_identity(&self, account: &AccountId) -> Result<Identity>;

    /// Whether the account holds an active identity
    async fn is_registered(&self, account: &AccountId) -> Result<bool>;

    /// Identity score, 0 if absent
    async fn get_score(&self, account: &AccountId) -> Result<u64>;

    // ========================================================================
    // Attributes
    // ========================================================================

    /// Create or overwrite one of the caller's attributes, clearing verification
    async fn set_attribute(
        &self,
        ctx: &CallerContext,
        name: String,
        value: String,
    ) -> Result<Attribute>;

    /// Verify another identity's attribute; any registered identity may verify
    async fn verify_attribute(
        &self,
        ctx: &CallerContext,
        owner: &AccountId,
        name: &str,
    ) -> Result<Attribute>;

    /// Raw attribute lookup with no expiry check
    async fn get_attribute(&self, owner: &AccountId, name: &str) -> Result<Option<Attribute>>;

    /// Attribute whose verification is still current, if any
    async fn get_verified_attribute(
        &self,
        owner: &AccountId,
        name: &str,
    ) -> Result<Option<Attribute>>;

    /// All attributes of an owner, ordered by name
    async fn list_attributes(&self, owner: &AccountId) -> Result<Vec<(String, Attribute)>>;

    // ========================================================================
    // Delegations
    // ========================================================================

    /// Grant the caller's permissions to a registered delegate
    async fn add_delegate(
        &self,
        ctx: &CallerContext,
        request: AddDelegateRequest,
    ) -> Result<Delegation>;

    /// Revoke a delegation held by the caller
    async fn remove_delegate(&self, ctx: &CallerContext, delegate: &AccountId) -> Result<()>;

    /// Whether `delegate` currently holds `permission` from `owner`
    ///
    /// Standalone check: no registry mutation consults it.
    async fn is_delegate_authorized(
        &self,
        owner: &AccountId,
        delegate: &AccountId,
        permission: &str,
    ) -> Result<bool>;

    /// Raw delegation lookup with no expiry check
    async fn get_delegate(
        &self,
        owner: &AccountId,
        delegate: &AccountId,
    ) -> Result<Option<Delegation>>;

    /// Delegation that has not yet expired, if any
    async fn get_active_delegate(
        &self,
        owner: &AccountId,
        delegate: &AccountId,
    ) -> Result<Option<Delegation>>;

    /// All delegations granted by an owner, expired ones included
    async fn list_delegates(&self, owner: &AccountId) -> Result<Vec<(AccountId, Delegation)>>;

    // ========================================================================
    // Activity
    // ========================================================================

    /// Activity trail of an owner in (timestamp, sequence) order
    async fn list_activity(&self, owner: &AccountId) -> Result<Vec<ActivityLogEntry>>;
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use crate::errors::RegistryError;
    use tokio::sync::Mutex;

    /// Publisher that keeps every entry it receives
    #[derive(Default)]
    pub struct RecordingEventPublisher {
        entries: Mutex<Vec<ActivityLogEntry>>,
    }

    impl RecordingEventPublisher {
        pub async fn entries(&self) -> Vec<ActivityLogEntry> {
            self.entries.lock().await.clone()
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingEventPublisher {
        async fn publish(&self, entry: ActivityLogEntry) -> Result<()> {
            self.entries.lock().await.push(entry);
            Ok(())
        }
    }

    /// Publisher that always fails
    pub struct FailingEventPublisher;

    #[async_trait]
    impl EventPublisher for FailingEventPublisher {
        async fn publish(&self, _entry: ActivityLogEntry) -> Result<()> {
            Err(RegistryError::Publish("sink offline".to_string()))
        }
    }
}
