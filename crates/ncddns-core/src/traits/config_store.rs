//! # Config Store Trait
//!
//! Defines the interface for the persisted updater settings: the cached
//! external address plus the domain/password pairs. The backing store is a
//! flat string-to-string mapping; one key is reserved for the cache, every
//! other key names a domain.
//!
//! ## Implementations
//!
//! - `EnvFileStore`: flat `key="value"` file on disk (production)
//! - `MemoryConfigStore`: in-memory map (tests and embedding)

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;

/// Reserved settings key holding the last address pushed to the provider.
pub const CACHED_IP_KEY: &str = "cached_ip";

/// Parsed view of the persisted settings.
///
/// Splits the reserved [`CACHED_IP_KEY`] entry from the domain entries so
/// the rest of the system never has to treat the two alike. A domain can
/// therefore never collide with the reserved key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Last external address recorded by a previous run, if any.
    ///
    /// Kept as the raw stored string; the engine compares it textually
    /// against the freshly discovered address.
    pub cached_ip: Option<String>,

    /// Domain name to dynamic-DNS password.
    ///
    /// `BTreeMap` keeps dispatch order stable across runs.
    pub domains: BTreeMap<String, String>,
}

impl Settings {
    /// Build a settings view from raw key/value pairs.
    ///
    /// The [`CACHED_IP_KEY`] entry (when present) becomes the cached
    /// address; every remaining pair is a domain entry.
    pub fn from_pairs(pairs: BTreeMap<String, String>) -> Self {
        let mut domains = pairs;
        let cached_ip = domains.remove(CACHED_IP_KEY);
        Self { cached_ip, domains }
    }

    /// Number of configured domains.
    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }
}

/// Trait for settings store implementations
///
/// Implementations must be `Send + Sync` to be usable from the async
/// engine.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the full settings record from the backing store.
    ///
    /// # Returns
    ///
    /// The parsed settings on success.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] when the store is missing,
    /// unreadable, or malformed. A missing store is an error, not an
    /// empty settings record.
    async fn load(&self) -> Result<Settings>;

    /// Durably update a single key, preserving every other entry.
    ///
    /// # Parameters
    ///
    /// - `key`: settings key to write (domain name or [`CACHED_IP_KEY`])
    /// - `value`: new value for the key
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] when the write cannot be made
    /// durable.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_pairs_splits_reserved_key() {
        let settings = Settings::from_pairs(pairs(&[
            ("cached_ip", "1.2.3.4"),
            ("example.com", "secret-a"),
            ("example.org", "secret-b"),
        ]));

        assert_eq!(settings.cached_ip.as_deref(), Some("1.2.3.4"));
        assert_eq!(settings.domain_count(), 2);
        assert_eq!(
            settings.domains.get("example.com").map(String::as_str),
            Some("secret-a")
        );
        assert!(!settings.domains.contains_key(CACHED_IP_KEY));
    }

    #[test]
    fn test_from_pairs_without_cache_entry() {
        let settings = Settings::from_pairs(pairs(&[("example.com", "secret")]));

        assert_eq!(settings.cached_ip, None);
        assert_eq!(settings.domain_count(), 1);
    }

    #[test]
    fn test_domains_iterate_in_name_order() {
        let settings = Settings::from_pairs(pairs(&[
            ("zeta.net", "z"),
            ("alpha.com", "a"),
            ("mid.org", "m"),
        ]));

        let names: Vec<&str> = settings.domains.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["alpha.com", "mid.org", "zeta.net"]);
    }
}
