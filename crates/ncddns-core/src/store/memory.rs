//! # In-Memory Settings Store
//!
//! Volatile [`ConfigStore`] used by tests and embedders. Clones share the
//! same underlying map, so a test can keep a handle while the engine owns
//! the boxed store.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::traits::{ConfigStore, Settings};

/// In-memory settings store
#[derive(Clone, Default)]
pub struct MemoryConfigStore {
    pairs: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `pairs`.
    pub fn with_pairs(pairs: BTreeMap<String, String>) -> Self {
        Self {
            pairs: Arc::new(RwLock::new(pairs)),
        }
    }

    /// Current value for `key`, if present.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.pairs.read().await.get(key).cloned()
    }

    /// Number of stored pairs.
    pub async fn len(&self) -> usize {
        self.pairs.read().await.len()
    }

    /// Whether the store holds no pairs.
    pub async fn is_empty(&self) -> bool {
        self.pairs.read().await.is_empty()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn load(&self) -> Result<Settings> {
        let pairs = self.pairs.read().await.clone();
        Ok(Settings::from_pairs(pairs))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.pairs
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
