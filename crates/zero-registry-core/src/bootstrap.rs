//! Wiring for a standalone, RocksDB-backed registry.

use crate::{
    clock::SystemClock, config::RegistryConfig, service::RegistryService, traits::EventPublisher,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use zero_registry_storage::RocksDbStorage;

/// Registry running on wall-clock time over RocksDB
pub type DurableRegistry<E> = RegistryService<SystemClock, E, RocksDbStorage>;

/// Open storage, build the service and make sure the genesis identity exists
pub async fn open_registry<E>(
    config: &RegistryConfig,
    event_publisher: Arc<E>,
) -> Result<DurableRegistry<E>>
where
    E: EventPublisher + 'static,
{
    if let Some(parent) = config.database_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let storage = Arc::new(RocksDbStorage::open(&config.database_path)?);
    let clock = Arc::new(SystemClock::new(config.clock_unit_seconds));

    let registry = RegistryService::new(clock, event_publisher, storage, config);
    registry.initialize().await?;

    info!(
        path = %config.database_path.display(),
        genesis = %config.genesis_account,
        "Registry opened"
    );
    Ok(registry)
}
