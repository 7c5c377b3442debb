//! Input bound checks.
//!
//! Lengths are counted in characters so that multi-byte names are held to the
//! same bound as ASCII ones.

use crate::constants::*;
use crate::errors::{RegistryError, Result};

/// Check that `value` has between `min` and `max` characters inclusive
pub fn validate_length(field: &'static str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(RegistryError::InvalidInput {
            field,
            reason: format!("length {} outside {}..={}", len, min, max),
        });
    }
    Ok(())
}

pub fn validate_display_name(name: &str) -> Result<()> {
    validate_length("display_name", name, 1, MAX_DISPLAY_NAME_LEN)
}

pub fn validate_attribute_name(name: &str) -> Result<()> {
    validate_length("attribute_name", name, 1, MAX_ATTRIBUTE_NAME_LEN)
}

pub fn validate_attribute_value(value: &str) -> Result<()> {
    validate_length("attribute_value", value, 1, MAX_ATTRIBUTE_VALUE_LEN)
}

/// Validate a delegation grant: 1..=10 permissions of at most 32 characters
/// each, and metadata of at most 256 characters.
pub fn validate_delegation(permissions: &[String], metadata: &str) -> Result<()> {
    if permissions.is_empty() || permissions.len() > MAX_PERMISSIONS {
        return Err(RegistryError::InvalidInput {
            field: "permissions",
            reason: format!(
                "{} permissions outside 1..={}",
                permissions.len(),
                MAX_PERMISSIONS
            ),
        });
    }

    for permission in permissions {
        validate_length("permission", permission, 0, MAX_PERMISSION_LEN)?;
    }

    validate_length("metadata", metadata, 0, MAX_DELEGATION_METADATA_LEN)
}

/// Requested delegation duration clamped to the maximum window
pub fn effective_delegation_duration(requested: u64) -> u64 {
    requested.min(MAX_DELEGATION_DURATION)
}

/// Truncate an activity payload to the payload bound
pub fn bounded_payload(payload: &str) -> String {
    payload.chars().take(MAX_ACTIVITY_PAYLOAD_LEN).collect()
}
