//! Identity registration and maintenance.

use crate::{
    clock::LogicalClock, constants::*, errors::*, traits::EventPublisher, types::*,
    validation::validate_display_name,
};
use tracing::{debug, info, warn};
use zero_registry_storage::{BatchExt, Storage, CF_IDENTITIES};

use super::RegistryService;

impl<C, E, S> RegistryService<C, E, S>
where
    C: LogicalClock + 'static,
    E: EventPublisher + 'static,
    S: Storage + 'static,
{
    /// Pre-register the genesis identity
    ///
    /// Idempotent: when a genesis record already exists it is returned as-is
    /// and nothing is written.
    pub async fn initialize(&self) -> Result<Identity> {
        let guard = self.write_lock.lock().await;
        let now = self.now()?;
        let genesis = &self.genesis_account;

        if let Some(existing) = self.load_identity(genesis).await? {
            debug!(%genesis, "Genesis identity already present");
            return Ok(existing);
        }

        let identity = Identity {
            active: true,
            display_name: GENESIS_DISPLAY_NAME.to_string(),
            registered_at: now,
            updated_at: now,
            backup_account: None,
            score: GENESIS_SCORE,
            verification_level: GENESIS_VERIFICATION_LEVEL,
        };

        let mut batch = self.storage.batch();
        batch.put(CF_IDENTITIES, genesis, &identity)?;
        let entry = self
            .stage_activity(
                batch.as_mut(),
                genesis,
                now,
                ActivityKind::Registration,
                Some(GENESIS_ACTIVITY_PAYLOAD),
                genesis,
            )
            .await?;
        self.commit_with_activity(guard, batch, entry).await?;

        info!(%genesis, "Genesis identity registered");
        Ok(identity)
    }

    /// Raise an identity's score
    ///
    /// Building block for reputation logic layered above the registry; it is
    /// not part of [`crate::IdentityRegistry`]. A positive `delta` adds exactly
    /// one point, any other value leaves the score unchanged. Returns the
    /// resulting score.
    pub async fn update_score(&self, account: &AccountId, delta: i64) -> Result<u64> {
        let _guard = self.write_lock.lock().await;
        let now = self.now()?;

        let mut identity = self
            .load_identity(account)
            .await?
            .ok_or_else(|| RegistryError::IdentityNotFound(account.clone()))?;

        if delta > 0 {
            identity.score = identity.score.saturating_add(1);
            identity.updated_at = now;
            self.storage.put(CF_IDENTITIES, account, &identity).await?;
            debug!(%account, score = identity.score, "Score incremented");
        }

        Ok(identity.score)
    }

    pub(crate) async fn register_internal(
        &self,
        ctx: &CallerContext,
        display_name: String,
    ) -> Result<Identity> {
        let guard = self.write_lock.lock().await;
        let now = self.now()?;
        let caller = ctx.caller();

        if self.is_registered_internal(caller).await? {
            warn!(%caller, "Duplicate registration rejected");
            return Err(RegistryError::IdentityExists(caller.clone()));
        }
        validate_display_name(&display_name)?;

        let identity = Identity::registered(display_name, now);

        let mut batch = self.storage.batch();
        batch.put(CF_IDENTITIES, caller, &identity)?;
        let entry = self
            .stage_activity(
                batch.as_mut(),
                caller,
                now,
                ActivityKind::Registration,
                Some(&identity.display_name),
                caller,
            )
            .await?;
        self.commit_with_activity(guard, batch, entry).await?;

        info!(%caller, "Identity registered");
        Ok(identity)
    }

    pub(crate) async fn update_display_name_internal(
        &self,
        ctx: &CallerContext,
        display_name: String,
    ) -> Result<Identity> {
        let guard = self.write_lock.lock().await;
        let now = self.now()?;
        let caller = ctx.caller();

        let mut identity = self.require_registered(caller).await?;
        validate_display_name(&display_name)?;

        identity.display_name = display_name;
        identity.updated_at = now;

        let mut batch = self.storage.batch();
        batch.put(CF_IDENTITIES, caller, &identity)?;
        let entry = self
            .stage_activity(
                batch.as_mut(),
                caller,
                now,
                ActivityKind::NameUpdate,
                Some(&identity.display_name),
                caller,
            )
            .await?;
        self.commit_with_activity(guard, batch, entry).await?;

        info!(%caller, "Display name updated");
        Ok(identity)
    }

    pub(crate) async fn set_backup_address_internal(
        &self,
        ctx: &CallerContext,
        backup: AccountId,
    ) -> Result<Identity> {
        let guard = self.write_lock.lock().await;
        let now = self.now()?;
        let caller = ctx.caller();

        let mut identity = self.require_registered(caller).await?;
        self.require_registered(&backup).await?;

        identity.backup_account = Some(backup.clone());
        identity.updated_at = now;

        let mut batch = self.storage.batch();
        batch.put(CF_IDENTITIES, caller, &identity)?;
        let entry = self
            .stage_activity(
                batch.as_mut(),
                caller,
                now,
                ActivityKind::BackupSet,
                Some(backup.as_str()),
                caller,
            )
            .await?;
        self.commit_with_activity(guard, batch, entry).await?;

        info!(%caller, %backup, "Backup address set");
        Ok(identity)
    }
}
