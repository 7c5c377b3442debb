//! Activity trail staging and publication.

use crate::{
    clock::LogicalClock, errors::*, traits::EventPublisher, types::*,
    validation::bounded_payload,
};
use tokio::sync::MutexGuard;
use tracing::warn;
use zero_registry_storage::{Batch, BatchExt, Storage, CF_ACTIVITY_LOG, CF_ACTIVITY_SEQUENCES};

use super::RegistryService;

impl<C, E, S> RegistryService<C, E, S>
where
    C: LogicalClock + 'static,
    E: EventPublisher + 'static,
    S: Storage + 'static,
{
    /// Stage the activity entry for an operation in the operation's batch
    ///
    /// Must be the last write staged before commit. The owner's sequence
    /// counter is advanced in the same batch.
    pub(super) async fn stage_activity(
        &self,
        batch: &mut dyn Batch,
        owner: &AccountId,
        now: u64,
        kind: ActivityKind,
        payload: Option<&str>,
        initiator: &AccountId,
    ) -> Result<ActivityLogEntry> {
        let sequence = self.next_activity_sequence(owner).await?;

        let entry = ActivityLogEntry {
            owner: owner.clone(),
            timestamp: now,
            sequence,
            kind,
            payload: payload.map(bounded_payload),
            initiator: initiator.clone(),
        };

        batch.put(CF_ACTIVITY_LOG, &(owner, now, sequence), &entry)?;
        batch.put(CF_ACTIVITY_SEQUENCES, owner, &sequence)?;

        Ok(entry)
    }

    /// Commit an operation's batch, release the write guard, then hand the
    /// entry to the publisher
    ///
    /// Publishers may call back into registry mutations. A publisher failure
    /// is logged; the committed operation stands.
    pub(super) async fn commit_with_activity(
        &self,
        guard: MutexGuard<'_, ()>,
        batch: Box<dyn Batch>,
        entry: ActivityLogEntry,
    ) -> Result<()> {
        batch.commit().await?;
        drop(guard);

        let owner = entry.owner.clone();
        let kind = entry.kind;
        if let Err(e) = self.event_publisher.publish(entry).await {
            warn!(%owner, %kind, error = %e, "Failed to publish activity");
        }

        Ok(())
    }

    async fn next_activity_sequence(&self, owner: &AccountId) -> Result<u64> {
        let last: Option<u64> = self.storage.get(CF_ACTIVITY_SEQUENCES, owner).await?;
        Ok(last.map_or(0, |sequence| sequence + 1))
    }

    pub(crate) async fn list_activity_internal(
        &self,
        owner: &AccountId,
    ) -> Result<Vec<ActivityLogEntry>> {
        let rows: Vec<(Vec<u8>, ActivityLogEntry)> =
            self.storage.get_by_prefix(CF_ACTIVITY_LOG, owner).await?;

        let mut entries: Vec<ActivityLogEntry> = rows.into_iter().map(|(_, entry)| entry).collect();
        entries.sort_by_key(|entry| (entry.timestamp, entry.sequence));

        Ok(entries)
    }
}
