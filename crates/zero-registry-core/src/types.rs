//! Registry type definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque account identifier
///
/// The registry never parses or derives anything from the identifier; it is
/// only compared and used as a storage key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Authenticated caller of a registry operation
///
/// Built by the dispatcher after it has authenticated the actor. The registry
/// trusts the wrapped identifier as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    caller: AccountId,
}

impl CallerContext {
    pub fn authenticated(caller: impl Into<AccountId>) -> Self {
        Self {
            caller: caller.into(),
        }
    }

    pub fn caller(&self) -> &AccountId {
        &self.caller
    }
}

/// Identity record
///
/// `Default` is the zero-value record returned for unknown accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub active: bool,
    pub display_name: String,
    pub registered_at: u64,
    pub updated_at: u64,
    pub backup_account: Option<AccountId>,
    pub score: u64,
    pub verification_level: u8,
}

impl Identity {
    /// A freshly registered identity
    pub fn registered(display_name: String, now: u64) -> Self {
        Self {
            active: true,
            display_name,
            registered_at: now,
            updated_at: now,
            backup_account: None,
            score: crate::constants::INITIAL_SCORE,
            verification_level: 0,
        }
    }
}

/// Attribute record keyed by (owner, name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub value: String,
    pub verified: bool,
    pub verifier: Option<AccountId>,
    pub verified_at: Option<u64>,
    pub verification_expires_at: Option<u64>,
    pub verification_metadata: Option<String>,
}

impl Attribute {
    /// A new attribute with no verification state
    pub fn unverified(value: String) -> Self {
        Self {
            value,
            verified: false,
            verifier: None,
            verified_at: None,
            verification_expires_at: None,
            verification_metadata: None,
        }
    }

    /// Whether the attribute is verified and the verification has not lapsed
    pub fn is_verification_current(&self, now: u64) -> bool {
        self.verified
            && self
                .verification_expires_at
                .map_or(false, |expires_at| now < expires_at)
    }
}

/// Delegation record keyed by (owner, delegate)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub permissions: Vec<String>,
    pub expires_at: u64,
    pub metadata: String,
    pub can_sub_delegate: bool,
}

impl Delegation {
    pub fn is_active(&self, now: u64) -> bool {
        self.expires_at > now
    }

    /// Whether the delegation is active at `now` and lists `permission`
    pub fn grants(&self, permission: &str, now: u64) -> bool {
        self.is_active(now) && self.permissions.iter().any(|p| p == permission)
    }
}

/// Add delegate request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddDelegateRequest {
    pub delegate: AccountId,
    pub permissions: Vec<String>,
    /// Requested lifetime; values above the maximum are clamped
    pub duration: u64,
    pub can_sub_delegate: bool,
    pub metadata: String,
}

/// Activity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityKind {
    Registration,
    NameUpdate,
    BackupSet,
    AttributeSet,
    AttributeVerified,
    DelegateAdded,
    DelegateRemoved,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Registration => "REGISTRATION",
            ActivityKind::NameUpdate => "NAME_UPDATE",
            ActivityKind::BackupSet => "BACKUP_SET",
            ActivityKind::AttributeSet => "ATTRIBUTE_SET",
            ActivityKind::AttributeVerified => "ATTRIBUTE_VERIFIED",
            ActivityKind::DelegateAdded => "DELEGATE_ADDED",
            ActivityKind::DelegateRemoved => "DELEGATE_REMOVED",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activity log entry keyed by (owner, timestamp, sequence)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub owner: AccountId,
    pub timestamp: u64,
    /// Per-owner counter; disambiguates entries sharing a timestamp
    pub sequence: u64,
    pub kind: ActivityKind,
    pub payload: Option<String>,
    pub initiator: AccountId,
}
