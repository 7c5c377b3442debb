//! Attribute storage and verification.

use crate::{
    clock::LogicalClock,
    constants::{VERIFICATION_METADATA, VERIFICATION_WINDOW},
    errors::*,
    traits::EventPublisher,
    types::*,
    validation::{validate_attribute_name, validate_attribute_value},
};
use tracing::{info, warn};
use zero_registry_storage::{decode_key, BatchExt, Storage, CF_ATTRIBUTES};

use super::RegistryService;

impl<C, E, S> RegistryService<C, E, S>
where
    C: LogicalClock + 'static,
    E: EventPublisher + 'static,
    S: Storage + 'static,
{
    pub(crate) async fn set_attribute_internal(
        &self,
        ctx: &CallerContext,
        name: String,
        value: String,
    ) -> Result<Attribute> {
        let guard = self.write_lock.lock().await;
        let now = self.now()?;
        let caller = ctx.caller();

        self.require_registered(caller).await?;
        validate_attribute_name(&name)?;
        validate_attribute_value(&value)?;

        // Overwrites always start unverified
        let attribute = Attribute::unverified(value);

        let mut batch = self.storage.batch();
        batch.put(CF_ATTRIBUTES, &(caller, &name), &attribute)?;
        let entry = self
            .stage_activity(
                batch.as_mut(),
                caller,
                now,
                ActivityKind::AttributeSet,
                Some(&name),
                caller,
            )
            .await?;
        self.commit_with_activity(guard, batch, entry).await?;

        info!(%caller, attribute = %name, "Attribute set");
        Ok(attribute)
    }

    pub(crate) async fn verify_attribute_internal(
        &self,
        ctx: &CallerContext,
        owner: &AccountId,
        name: &str,
    ) -> Result<Attribute> {
        let guard = self.write_lock.lock().await;
        let now = self.now()?;
        let verifier = ctx.caller();

        self.require_registered(owner).await?;
        if !self.is_registered_internal(verifier).await? {
            warn!(%owner, %verifier, "Verification by unregistered identity rejected");
            return Err(RegistryError::UnauthorizedVerifier(verifier.clone()));
        }

        let mut attribute: Attribute = self
            .storage
            .get(CF_ATTRIBUTES, &(owner, name))
            .await?
            .ok_or_else(|| RegistryError::AttributeNotFound {
                owner: owner.clone(),
                name: name.to_string(),
            })?;

        attribute.verified = true;
        attribute.verifier = Some(verifier.clone());
        attribute.verified_at = Some(now);
        attribute.verification_expires_at = Some(now.saturating_add(VERIFICATION_WINDOW));
        attribute.verification_metadata = Some(VERIFICATION_METADATA.to_string());

        let mut batch = self.storage.batch();
        batch.put(CF_ATTRIBUTES, &(owner, name), &attribute)?;
        let entry = self
            .stage_activity(
                batch.as_mut(),
                owner,
                now,
                ActivityKind::AttributeVerified,
                Some(name),
                verifier,
            )
            .await?;
        self.commit_with_activity(guard, batch, entry).await?;

        info!(%owner, %verifier, attribute = %name, "Attribute verified");
        Ok(attribute)
    }

    pub(crate) async fn get_attribute_internal(
        &self,
        owner: &AccountId,
        name: &str,
    ) -> Result<Option<Attribute>> {
        Ok(self.storage.get(CF_ATTRIBUTES, &(owner, name)).await?)
    }

    /// Attribute lookup that drops unverified and lapsed attributes
    pub(crate) async fn get_verified_attribute_internal(
        &self,
        owner: &AccountId,
        name: &str,
    ) -> Result<Option<Attribute>> {
        let now = self.now()?;
        Ok(self
            .get_attribute_internal(owner, name)
            .await?
            .filter(|attribute| attribute.is_verification_current(now)))
    }

    pub(crate) async fn list_attributes_internal(
        &self,
        owner: &AccountId,
    ) -> Result<Vec<(String, Attribute)>> {
        let rows: Vec<(Vec<u8>, Attribute)> =
            self.storage.get_by_prefix(CF_ATTRIBUTES, owner).await?;

        let mut attributes = rows
            .into_iter()
            .map(|(key, attribute)| {
                let (_, name): (AccountId, String) = decode_key(&key)?;
                Ok((name, attribute))
            })
            .collect::<Result<Vec<_>>>()?;
        attributes.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(attributes)
    }
}
