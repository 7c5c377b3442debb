//! Delegation grants and checks.

use crate::{
    clock::LogicalClock,
    errors::*,
    traits::EventPublisher,
    types::*,
    validation::{effective_delegation_duration, validate_delegation},
};
use tracing::{debug, info};
use zero_registry_storage::{decode_key, BatchExt, Storage, CF_DELEGATIONS};

use super::RegistryService;

impl<C, E, S> RegistryService<C, E, S>
where
    C: LogicalClock + 'static,
    E: EventPublisher + 'static,
    S: Storage + 'static,
{
    pub(crate) async fn add_delegate_internal(
        &self,
        ctx: &CallerContext,
        request: AddDelegateRequest,
    ) -> Result<Delegation> {
        let guard = self.write_lock.lock().await;
        let now = self.now()?;
        let owner = ctx.caller();

        self.require_registered(owner).await?;
        if !self.is_registered_internal(&request.delegate).await? {
            return Err(RegistryError::DelegateNotFound(request.delegate));
        }
        validate_delegation(&request.permissions, &request.metadata)?;

        let duration = effective_delegation_duration(request.duration);
        if duration < request.duration {
            debug!(
                %owner,
                requested = request.duration,
                granted = duration,
                "Delegation duration clamped"
            );
        }

        let delegation = Delegation {
            permissions: request.permissions,
            expires_at: now.saturating_add(duration),
            metadata: request.metadata,
            can_sub_delegate: request.can_sub_delegate,
        };
        let delegate = request.delegate;

        let mut batch = self.storage.batch();
        batch.put(CF_DELEGATIONS, &(owner, &delegate), &delegation)?;
        let entry = self
            .stage_activity(
                batch.as_mut(),
                owner,
                now,
                ActivityKind::DelegateAdded,
                Some(delegate.as_str()),
                owner,
            )
            .await?;
        self.commit_with_activity(guard, batch, entry).await?;

        info!(
            %owner,
            %delegate,
            expires_at = delegation.expires_at,
            "Delegate added"
        );
        Ok(delegation)
    }

    pub(crate) async fn remove_delegate_internal(
        &self,
        ctx: &CallerContext,
        delegate: &AccountId,
    ) -> Result<()> {
        let guard = self.write_lock.lock().await;
        let now = self.now()?;
        let owner = ctx.caller();

        self.require_registered(owner).await?;
        if !self
            .storage
            .exists(CF_DELEGATIONS, &(owner, delegate))
            .await?
        {
            return Err(RegistryError::DelegateNotFound(delegate.clone()));
        }

        let mut batch = self.storage.batch();
        batch.delete(CF_DELEGATIONS, &(owner, delegate))?;
        let entry = self
            .stage_activity(
                batch.as_mut(),
                owner,
                now,
                ActivityKind::DelegateRemoved,
                Some(delegate.as_str()),
                owner,
            )
            .await?;
        self.commit_with_activity(guard, batch, entry).await?;

        info!(%owner, %delegate, "Delegate removed");
        Ok(())
    }

    pub(crate) async fn is_delegate_authorized_internal(
        &self,
        owner: &AccountId,
        delegate: &AccountId,
        permission: &str,
    ) -> Result<bool> {
        let now = self.now()?;
        Ok(self
            .get_delegate_internal(owner, delegate)
            .await?
            .map_or(false, |delegation| delegation.grants(permission, now)))
    }

    pub(crate) async fn get_delegate_internal(
        &self,
        owner: &AccountId,
        delegate: &AccountId,
    ) -> Result<Option<Delegation>> {
        Ok(self.storage.get(CF_DELEGATIONS, &(owner, delegate)).await?)
    }

    /// Delegation lookup that drops expired grants
    pub(crate) async fn get_active_delegate_internal(
        &self,
        owner: &AccountId,
        delegate: &AccountId,
    ) -> Result<Option<Delegation>> {
        let now = self.now()?;
        Ok(self
            .get_delegate_internal(owner, delegate)
            .await?
            .filter(|delegation| delegation.is_active(now)))
    }

    pub(crate) async fn list_delegates_internal(
        &self,
        owner: &AccountId,
    ) -> Result<Vec<(AccountId, Delegation)>> {
        let rows: Vec<(Vec<u8>, Delegation)> =
            self.storage.get_by_prefix(CF_DELEGATIONS, owner).await?;

        let mut delegations = rows
            .into_iter()
            .map(|(key, delegation)| {
                let (_, delegate): (AccountId, AccountId) = decode_key(&key)?;
                Ok((delegate, delegation))
            })
            .collect::<Result<Vec<_>>>()?;
        delegations.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(delegations)
    }
}
