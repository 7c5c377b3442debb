use crate::types::AccountId;
use anyhow::Result;
use std::path::PathBuf;

/// Registry configuration
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Account pre-registered by `initialize`
    pub genesis_account: AccountId,

    /// Path to the RocksDB database
    pub database_path: PathBuf,

    /// Seconds per logical time unit when running on the system clock
    pub clock_unit_seconds: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            genesis_account: AccountId::from("genesis"),
            database_path: PathBuf::from("./data/zero-registry.db"),
            clock_unit_seconds: 600,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let genesis_account = match lookup("REGISTRY_GENESIS_ACCOUNT") {
            Some(account) if account.trim().is_empty() => {
                anyhow::bail!("REGISTRY_GENESIS_ACCOUNT must not be empty")
            }
            Some(account) => AccountId::from(account),
            None => defaults.genesis_account,
        };

        let database_path = lookup("REGISTRY_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let clock_unit_seconds = match lookup("REGISTRY_CLOCK_UNIT_SECONDS") {
            Some(raw) => raw.parse()?,
            None => defaults.clock_unit_seconds,
        };
        if clock_unit_seconds == 0 {
            anyhow::bail!("REGISTRY_CLOCK_UNIT_SECONDS must be greater than zero");
        }

        Ok(Self {
            genesis_account,
            database_path,
            clock_unit_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = RegistryConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.genesis_account, AccountId::from("genesis"));
        assert_eq!(config.database_path, PathBuf::from("./data/zero-registry.db"));
        assert_eq!(config.clock_unit_seconds, 600);
    }

    #[test]
    fn test_overrides() {
        let config = RegistryConfig::from_lookup(lookup_from(&[
            ("REGISTRY_GENESIS_ACCOUNT", "root"),
            ("REGISTRY_DATABASE_PATH", "/var/lib/registry"),
            ("REGISTRY_CLOCK_UNIT_SECONDS", "60"),
        ]))
        .unwrap();

        assert_eq!(config.genesis_account, AccountId::from("root"));
        assert_eq!(config.database_path, PathBuf::from("/var/lib/registry"));
        assert_eq!(config.clock_unit_seconds, 60);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(RegistryConfig::from_lookup(lookup_from(&[(
            "REGISTRY_CLOCK_UNIT_SECONDS",
            "0"
        )]))
        .is_err());
        assert!(RegistryConfig::from_lookup(lookup_from(&[(
            "REGISTRY_CLOCK_UNIT_SECONDS",
            "ten"
        )]))
        .is_err());
        assert!(
            RegistryConfig::from_lookup(lookup_from(&[("REGISTRY_GENESIS_ACCOUNT", "  ")]))
                .is_err()
        );
    }
}
