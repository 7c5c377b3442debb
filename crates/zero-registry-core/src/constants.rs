//! Registry limits and fixed windows.
//!
//! All values are normative: stored records written under one set of limits
//! must stay valid for every reader.

/// Maximum display name length in characters
pub const MAX_DISPLAY_NAME_LEN: usize = 64;

/// Maximum attribute name length in characters
pub const MAX_ATTRIBUTE_NAME_LEN: usize = 32;

/// Maximum attribute value length in characters
pub const MAX_ATTRIBUTE_VALUE_LEN: usize = 256;

/// Maximum number of permissions in one delegation
pub const MAX_PERMISSIONS: usize = 10;

/// Maximum length of a single permission string in characters
pub const MAX_PERMISSION_LEN: usize = 32;

/// Maximum delegation metadata length in characters
pub const MAX_DELEGATION_METADATA_LEN: usize = 256;

/// Maximum activity type tag length in characters
pub const MAX_ACTIVITY_TYPE_LEN: usize = 32;

/// Maximum activity payload length in characters
pub const MAX_ACTIVITY_PAYLOAD_LEN: usize = 256;

/// Lifetime of an attribute verification in logical time units
pub const VERIFICATION_WINDOW: u64 = 2880;

/// Longest delegation that can be granted in logical time units
pub const MAX_DELEGATION_DURATION: u64 = 52560;

/// Score assigned at registration
pub const INITIAL_SCORE: u64 = 1;

/// Highest verification level an identity can hold
pub const MAX_VERIFICATION_LEVEL: u8 = 5;

/// Score of the genesis identity
pub const GENESIS_SCORE: u64 = 100;

/// Verification level of the genesis identity
pub const GENESIS_VERIFICATION_LEVEL: u8 = MAX_VERIFICATION_LEVEL;

/// Display name given to the genesis identity
pub const GENESIS_DISPLAY_NAME: &str = "Genesis";

/// Activity payload recorded for the genesis registration
pub const GENESIS_ACTIVITY_PAYLOAD: &str = "genesis";

/// Metadata stamped on every attribute verification
pub const VERIFICATION_METADATA: &str = "Verified by registered authority";
