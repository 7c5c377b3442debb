//! Test helpers and mocks for registry service tests.

use crate::traits::mocks::RecordingEventPublisher;
use crate::*;
use async_trait::async_trait;
use std::sync::{Arc, OnceLock, Weak};
use tempfile::TempDir;
use zero_registry_storage::{MemoryStorage, RocksDbStorage};

/// Logical time the test clock starts at
pub const START_TIME: u64 = 1_000;

pub type TestRegistry = RegistryService<ManualClock, RecordingEventPublisher, MemoryStorage>;

pub type DurableTestRegistry = RegistryService<ManualClock, NoOpEventPublisher, RocksDbStorage>;

/// In-memory registry with handles on its collaborators
pub struct TestHarness {
    pub registry: TestRegistry,
    pub clock: Arc<ManualClock>,
    pub publisher: Arc<RecordingEventPublisher>,
    pub storage: Arc<MemoryStorage>,
}

/// Clock whose time source is always down
pub struct BrokenClock;

impl LogicalClock for BrokenClock {
    fn now(&self) -> Result<u64> {
        Err(RegistryError::ClockUnavailable(
            "time source offline".to_string(),
        ))
    }
}

pub type ScoringRegistry = RegistryService<ManualClock, ScoringPublisher, MemoryStorage>;

/// Publisher that rewards verified attributes through the registry it serves
#[derive(Default)]
pub struct ScoringPublisher {
    registry: OnceLock<Weak<ScoringRegistry>>,
}

impl ScoringPublisher {
    pub fn attach(&self, registry: &Arc<ScoringRegistry>) {
        let _ = self.registry.set(Arc::downgrade(registry));
    }
}

#[async_trait]
impl EventPublisher for ScoringPublisher {
    async fn publish(&self, entry: ActivityLogEntry) -> Result<()> {
        if entry.kind != ActivityKind::AttributeVerified {
            return Ok(());
        }
        if let Some(registry) = self.registry.get().and_then(Weak::upgrade) {
            registry.update_score(&entry.owner, 1).await?;
        }
        Ok(())
    }
}

/// Helper to create an initialized in-memory registry
pub async fn create_test_registry() -> TestHarness {
    let clock = Arc::new(ManualClock::new(START_TIME));
    let publisher = Arc::new(RecordingEventPublisher::default());
    let storage = Arc::new(MemoryStorage::new());

    let registry = RegistryService::new(
        Arc::clone(&clock),
        Arc::clone(&publisher),
        Arc::clone(&storage),
        &RegistryConfig::default(),
    );
    registry.initialize().await.unwrap();

    TestHarness {
        registry,
        clock,
        publisher,
        storage,
    }
}

/// Helper to create test storage
pub fn create_test_storage() -> (Arc<RocksDbStorage>, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db = RocksDbStorage::open(temp_dir.path()).unwrap();
    (Arc::new(db), temp_dir)
}

/// Helper to create a RocksDB-backed registry over `storage`
pub fn create_durable_registry(
    storage: Arc<RocksDbStorage>,
    clock: Arc<ManualClock>,
) -> DurableTestRegistry {
    RegistryService::new(
        clock,
        Arc::new(NoOpEventPublisher),
        storage,
        &RegistryConfig::default(),
    )
}

pub fn ctx(account: &str) -> CallerContext {
    CallerContext::authenticated(account)
}

pub fn account(id: &str) -> AccountId {
    AccountId::from(id)
}

/// Helper to register `id` with a display name derived from it
pub async fn register(registry: &impl IdentityRegistry, id: &str) -> Identity {
    registry.register(&ctx(id), format!("{id} display")).await.unwrap()
}

pub fn delegate_request(delegate: &str, permissions: &[&str], duration: u64) -> AddDelegateRequest {
    AddDelegateRequest {
        delegate: account(delegate),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
        duration,
        can_sub_delegate: false,
        metadata: String::new(),
    }
}
