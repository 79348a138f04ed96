//! In-memory config storage for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::ConfigStore;
use crate::error::Result;
use crate::models::config::Config;

/// In-memory config storage, primarily for testing.
pub struct MemoryConfigStore {
    config: RwLock<Config>,
    saves: AtomicUsize,
}

impl MemoryConfigStore {
    /// Create storage holding the default record.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create storage pre-populated with `config`.
    pub fn with_config(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of times [`ConfigStore::save`] has been called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn load(&self) -> Result<Config> {
        Ok(self.config.read().await.clone())
    }

    async fn save(&self, config: &Config) -> Result<()> {
        *self.config.write().await = config.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage() {
        let store = MemoryConfigStore::new();
        assert_eq!(store.load().await.unwrap(), Config::default());
        assert_eq!(store.save_count(), 0);

        let config = Config {
            api_key: Some("abc".into()),
            ..Config::default()
        };
        store.save(&config).await.unwrap();

        assert_eq!(store.load().await.unwrap(), config);
        assert_eq!(store.save_count(), 1);
    }
}
