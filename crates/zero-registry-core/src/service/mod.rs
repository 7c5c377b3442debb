//! Registry service implementation.

mod activity;
mod attributes;
mod delegation;
mod identity;

use crate::{clock::LogicalClock, config::RegistryConfig, errors::*, traits::*, types::*};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use zero_registry_storage::{Storage, CF_IDENTITIES};

/// Registry service implementation
///
/// Mutating operations run one at a time behind `write_lock`, which spans the
/// clock read, every precondition check and the batch commit. The lock is
/// released before the activity entry is published. Reads go straight to
/// storage.
pub struct RegistryService<C, E, S>
where
    C: LogicalClock,
    E: EventPublisher,
    S: Storage,
{
    pub(super) clock: Arc<C>,
    pub(super) event_publisher: Arc<E>,
    pub(super) storage: Arc<S>,
    pub(super) genesis_account: AccountId,
    pub(super) write_lock: Mutex<()>,
}

impl<C, E, S> RegistryService<C, E, S>
where
    C: LogicalClock,
    E: EventPublisher,
    S: Storage,
{
    /// Create a new registry service
    ///
    /// Call [`RegistryService::initialize`] once before serving requests so the
    /// genesis identity exists.
    pub fn new(
        clock: Arc<C>,
        event_publisher: Arc<E>,
        storage: Arc<S>,
        config: &RegistryConfig,
    ) -> Self {
        Self {
            clock,
            event_publisher,
            storage,
            genesis_account: config.genesis_account.clone(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn genesis_account(&self) -> &AccountId {
        &self.genesis_account
    }

    pub(super) fn now(&self) -> Result<u64> {
        self.clock.now()
    }

    pub(super) async fn load_identity(&self, account: &AccountId) -> Result<Option<Identity>> {
        Ok(self.storage.get(CF_IDENTITIES, account).await?)
    }

    pub(super) async fn is_registered_internal(&self, account: &AccountId) -> Result<bool> {
        Ok(self
            .load_identity(account)
            .await?
            .map_or(false, |identity| identity.active))
    }

    /// Load an identity that must exist and be active
    pub(super) async fn require_registered(&self, account: &AccountId) -> Result<Identity> {
        match self.load_identity(account).await? {
            Some(identity) if identity.active => Ok(identity),
            _ => Err(RegistryError::IdentityNotFound(account.clone())),
        }
    }
}

#[async_trait]
impl<C, E, S> IdentityRegistry for RegistryService<C, E, S>
where
    C: LogicalClock + 'static,
    E: EventPublisher + 'static,
    S: Storage + 'static,
{
    async fn register(&self, ctx: &CallerContext, display_name: String) -> Result<Identity> {
        self.register_internal(ctx, display_name).await
    }

    async fn update_display_name(
        &self,
        ctx: &CallerContext,
        display_name: String,
    ) -> Result<Identity> {
        self.update_display_name_internal(ctx, display_name).await
    }

    async fn set_backup_address(&self, ctx: &CallerContext, backup: AccountId) -> Result<Identity> {
        self.set_backup_address_internal(ctx, backup).await
    }

    async fn get_identity(&self, account: &AccountId) -> Result<Identity> {
        Ok(self.load_identity(account).await?.unwrap_or_default())
    }

    async fn is_registered(&self, account: &AccountId) -> Result<bool> {
        self.is_registered_internal(account).await
    }

    async fn get_score(&self, account: &AccountId) -> Result<u64> {
        Ok(self
            .load_identity(account)
            .await?
            .map_or(0, |identity| identity.score))
    }

    async fn set_attribute(
        &self,
        ctx: &CallerContext,
        name: String,
        value: String,
    ) -> Result<Attribute> {
        self.set_attribute_internal(ctx, name, value).await
    }

    async fn verify_attribute(
        &self,
        ctx: &CallerContext,
        owner: &AccountId,
        name: &str,
    ) -> Result<Attribute> {
        self.verify_attribute_internal(ctx, owner, name).await
    }

    async fn get_attribute(&self, owner: &AccountId, name: &str) -> Result<Option<Attribute>> {
        self.get_attribute_internal(owner, name).await
    }

    async fn get_verified_attribute(
        &self,
        owner: &AccountId,
        name: &str,
    ) -> Result<Option<Attribute>> {
        self.get_verified_attribute_internal(owner, name).await
    }

    async fn list_attributes(&self, owner: &AccountId) -> Result<Vec<(String, Attribute)>> {
        self.list_attributes_internal(owner).await
    }

    async fn add_delegate(
        &self,
        ctx: &CallerContext,
        request: AddDelegateRequest,
    ) -> Result<Delegation> {
        self.add_delegate_internal(ctx, request).await
    }

    async fn remove_delegate(&self, ctx: &CallerContext, delegate: &AccountId) -> Result<()> {
        self.remove_delegate_internal(ctx, delegate).await
    }

    async fn is_delegate_authorized(
        &self,
        owner: &AccountId,
        delegate: &AccountId,
        permission: &str,
    ) -> Result<bool> {
        self.is_delegate_authorized_internal(owner, delegate, permission)
            .await
    }

    async fn get_delegate(
        &self,
        owner: &AccountId,
        delegate: &AccountId,
    ) -> Result<Option<Delegation>> {
        self.get_delegate_internal(owner, delegate).await
    }

    async fn get_active_delegate(
        &self,
        owner: &AccountId,
        delegate: &AccountId,
    ) -> Result<Option<Delegation>> {
        self.get_active_delegate_internal(owner, delegate).await
    }

    async fn list_delegates(&self, owner: &AccountId) -> Result<Vec<(AccountId, Delegation)>> {
        self.list_delegates_internal(owner).await
    }

    async fn list_activity(&self, owner: &AccountId) -> Result<Vec<ActivityLogEntry>> {
        self.list_activity_internal(owner).await
    }
}
