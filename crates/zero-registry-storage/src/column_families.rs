//! Column family definitions for the registry collections.

/// Identity records: account_id → Identity
pub const CF_IDENTITIES: &str = "identities";

/// Attribute records: (owner, attribute_name) → Attribute
pub const CF_ATTRIBUTES: &str = "attributes";

/// Delegation records: (owner, delegate) → Delegation
pub const CF_DELEGATIONS: &str = "delegations";

/// Activity trail: (owner, timestamp, sequence) → ActivityLogEntry
pub const CF_ACTIVITY_LOG: &str = "activity_log";

/// Per-owner activity sequence counters: owner → u64
pub const CF_ACTIVITY_SEQUENCES: &str = "activity_sequences";

/// Get all column family names
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        CF_IDENTITIES,
        CF_ATTRIBUTES,
        CF_DELEGATIONS,
        CF_ACTIVITY_LOG,
        CF_ACTIVITY_SEQUENCES,
    ]
}
