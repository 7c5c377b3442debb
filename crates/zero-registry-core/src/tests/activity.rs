use super::helpers::*;
use crate::constants::*;
use crate::traits::mocks::FailingEventPublisher;
use crate::*;
use std::sync::Arc;
use std::time::Duration;
use zero_registry_storage::MemoryStorage;

fn kinds(entries: &[ActivityLogEntry]) -> Vec<ActivityKind> {
    entries.iter().map(|entry| entry.kind).collect()
}

#[tokio::test]
async fn test_every_mutation_appends_one_entry() {
    let h = create_test_registry().await;
    register(&h.registry, "alice").await;
    register(&h.registry, "bob").await;
    let alice = account("alice");

    h.clock.advance(1);
    h.registry
        .update_display_name(&ctx("alice"), "Alice".to_string())
        .await
        .unwrap();
    h.clock.advance(1);
    h.registry
        .set_backup_address(&ctx("alice"), account("bob"))
        .await
        .unwrap();
    h.clock.advance(1);
    h.registry
        .set_attribute(&ctx("alice"), "email".to_string(), "a@x.com".to_string())
        .await
        .unwrap();
    h.clock.advance(1);
    h.registry
        .verify_attribute(&ctx("bob"), &alice, "email")
        .await
        .unwrap();
    h.clock.advance(1);
    h.registry
        .add_delegate(&ctx("alice"), delegate_request("bob", &["read"], 10))
        .await
        .unwrap();
    h.clock.advance(1);
    h.registry
        .remove_delegate(&ctx("alice"), &account("bob"))
        .await
        .unwrap();

    let entries = h.registry.list_activity(&alice).await.unwrap();
    assert_eq!(
        kinds(&entries),
        vec![
            ActivityKind::Registration,
            ActivityKind::NameUpdate,
            ActivityKind::BackupSet,
            ActivityKind::AttributeSet,
            ActivityKind::AttributeVerified,
            ActivityKind::DelegateAdded,
            ActivityKind::DelegateRemoved,
        ]
    );

    let payloads: Vec<Option<&str>> = entries.iter().map(|e| e.payload.as_deref()).collect();
    assert_eq!(
        payloads,
        vec![
            Some("alice display"),
            Some("Alice"),
            Some("bob"),
            Some("email"),
            Some("email"),
            Some("bob"),
            Some("bob"),
        ]
    );

    let timestamps: Vec<u64> = entries.iter().map(|e| e.timestamp).collect();
    assert_eq!(timestamps, (START_TIME..=START_TIME + 6).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_verification_is_logged_under_owner() {
    let h = create_test_registry().await;
    register(&h.registry, "alice").await;
    register(&h.registry, "bob").await;

    h.registry
        .set_attribute(&ctx("alice"), "email".to_string(), "a@x.com".to_string())
        .await
        .unwrap();
    h.registry
        .verify_attribute(&ctx("bob"), &account("alice"), "email")
        .await
        .unwrap();

    let entries = h.registry.list_activity(&account("alice")).await.unwrap();
    let verified = entries.last().unwrap();
    assert_eq!(verified.kind, ActivityKind::AttributeVerified);
    assert_eq!(verified.owner, account("alice"));
    assert_eq!(verified.initiator, account("bob"));

    let bob_entries = h.registry.list_activity(&account("bob")).await.unwrap();
    assert_eq!(kinds(&bob_entries), vec![ActivityKind::Registration]);
}

#[tokio::test]
async fn test_same_timestamp_entries_are_kept() {
    let h = create_test_registry().await;
    register(&h.registry, "alice").await;

    for name in ["email", "phone", "website"] {
        h.registry
            .set_attribute(&ctx("alice"), name.to_string(), "v".to_string())
            .await
            .unwrap();
    }

    let entries = h.registry.list_activity(&account("alice")).await.unwrap();
    assert_eq!(entries.len(), 4);
    assert!(entries.iter().all(|e| e.timestamp == START_TIME));

    let sequences: Vec<u64> = entries.iter().map(|e| e.sequence).collect();
    assert_eq!(sequences, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn test_failed_operations_leave_no_entry() {
    let h = create_test_registry().await;
    register(&h.registry, "alice").await;
    let alice = ctx("alice");

    h.registry
        .register(&alice, "Again".to_string())
        .await
        .unwrap_err();
    h.registry
        .update_display_name(&alice, String::new())
        .await
        .unwrap_err();
    h.registry
        .set_backup_address(&alice, account("nobody"))
        .await
        .unwrap_err();
    h.registry
        .set_attribute(&alice, "email".to_string(), String::new())
        .await
        .unwrap_err();
    h.registry
        .verify_attribute(&alice, &account("alice"), "email")
        .await
        .unwrap_err();
    h.registry
        .add_delegate(&alice, delegate_request("nobody", &["read"], 10))
        .await
        .unwrap_err();
    h.registry
        .remove_delegate(&alice, &account("nobody"))
        .await
        .unwrap_err();

    let entries = h.registry.list_activity(&account("alice")).await.unwrap();
    assert_eq!(kinds(&entries), vec![ActivityKind::Registration]);
}

#[tokio::test]
async fn test_initiator_is_caller() {
    let h = create_test_registry().await;
    register(&h.registry, "alice").await;

    let entries = h.registry.list_activity(&account("alice")).await.unwrap();
    assert_eq!(entries[0].owner, account("alice"));
    assert_eq!(entries[0].initiator, account("alice"));
}

#[tokio::test]
async fn test_genesis_entry() {
    let h = create_test_registry().await;
    let genesis = h.registry.genesis_account().clone();

    let entries = h.registry.list_activity(&genesis).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, ActivityKind::Registration);
    assert_eq!(entries[0].payload.as_deref(), Some(GENESIS_ACTIVITY_PAYLOAD));
    assert_eq!(entries[0].initiator, genesis);
}

#[tokio::test]
async fn test_payload_is_bounded() {
    let h = create_test_registry().await;
    let long_id = "b".repeat(MAX_ACTIVITY_PAYLOAD_LEN + 40);
    register(&h.registry, "alice").await;
    h.registry
        .register(&ctx(&long_id), "Long".to_string())
        .await
        .unwrap();

    h.registry
        .set_backup_address(&ctx("alice"), account(&long_id))
        .await
        .unwrap();

    let entries = h.registry.list_activity(&account("alice")).await.unwrap();
    let payload = entries.last().unwrap().payload.as_deref().unwrap();
    assert_eq!(payload.chars().count(), MAX_ACTIVITY_PAYLOAD_LEN);
    assert!(long_id.starts_with(payload));
}

#[tokio::test]
async fn test_publisher_receives_committed_entries() {
    let h = create_test_registry().await;
    register(&h.registry, "alice").await;

    let published = h.publisher.entries().await;
    assert_eq!(published.len(), 2);
    assert_eq!(published[0].owner, *h.registry.genesis_account());
    assert_eq!(
        published[1],
        h.registry.list_activity(&account("alice")).await.unwrap()[0]
    );

    h.registry
        .register(&ctx("alice"), "Again".to_string())
        .await
        .unwrap_err();
    assert_eq!(h.publisher.entries().await.len(), 2);
}

#[tokio::test]
async fn test_publish_failure_keeps_commit() {
    let registry = RegistryService::new(
        Arc::new(ManualClock::new(START_TIME)),
        Arc::new(FailingEventPublisher),
        Arc::new(MemoryStorage::new()),
        &RegistryConfig::default(),
    );

    registry.initialize().await.unwrap();
    let identity = registry
        .register(&ctx("alice"), "Alice".to_string())
        .await
        .unwrap();

    assert_eq!(registry.get_identity(&account("alice")).await.unwrap(), identity);
    assert_eq!(registry.list_activity(&account("alice")).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_publisher_may_call_back_into_registry() {
    let publisher = Arc::new(ScoringPublisher::default());
    let registry = Arc::new(RegistryService::new(
        Arc::new(ManualClock::new(START_TIME)),
        Arc::clone(&publisher),
        Arc::new(MemoryStorage::new()),
        &RegistryConfig::default(),
    ));
    publisher.attach(&registry);

    registry.initialize().await.unwrap();
    register(registry.as_ref(), "alice").await;
    register(registry.as_ref(), "bob").await;
    registry
        .set_attribute(&ctx("alice"), "email".to_string(), "a@x.com".to_string())
        .await
        .unwrap();

    let verified = tokio::time::timeout(
        Duration::from_secs(2),
        registry.verify_attribute(&ctx("bob"), &account("alice"), "email"),
    )
    .await;

    assert!(verified.is_ok(), "verification blocked on its publisher");
    assert!(verified.unwrap().unwrap().verified);
    assert_eq!(registry.get_score(&account("alice")).await.unwrap(), 2);

    // The write lock is free again
    tokio::time::timeout(
        Duration::from_secs(2),
        registry.update_display_name(&ctx("alice"), "Alice".to_string()),
    )
    .await
    .unwrap()
    .unwrap();
}
