//! Config persistence backends.
//!
//! Provides the [`ConfigStore`] trait and implementations:
//! - [`FileConfigStore`] - JSON file with 0600 permissions
//! - [`MemoryConfigStore`] - In-memory (testing)
//!
//! The whole record is read on every [`ConfigStore::load`] and rewritten on
//! every [`ConfigStore::save`]. There is no locking between processes.

mod file;
mod memory;

use async_trait::async_trait;

pub use file::FileConfigStore;
pub use memory::MemoryConfigStore;

use crate::error::Result;
use crate::models::config::Config;

/// Trait for config storage backends.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the current record, or defaults if nothing has been saved.
    async fn load(&self) -> Result<Config>;

    /// Replace the stored record.
    async fn save(&self, config: &Config) -> Result<()>;

    /// Name of this storage backend.
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Blanket impl for `Arc<T>`.
#[async_trait]
impl<T: ConfigStore + ?Sized> ConfigStore for std::sync::Arc<T> {
    async fn load(&self) -> Result<Config> {
        (**self).load().await
    }
    async fn save(&self, config: &Config) -> Result<()> {
        (**self).save(config).await
    }
    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Blanket impl for `Box<T>`.
#[async_trait]
impl<T: ConfigStore + ?Sized> ConfigStore for Box<T> {
    async fn load(&self) -> Result<Config> {
        (**self).load().await
    }
    async fn save(&self, config: &Config) -> Result<()> {
        (**self).save(config).await
    }
    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Load the record, apply `change`, and save it back. Returns the saved record.
pub async fn modify<S, F>(store: &S, change: F) -> Result<Config>
where
    S: ConfigStore + ?Sized,
    F: FnOnce(&mut Config) + Send,
{
    let mut config = store.load().await?;
    change(&mut config);
    store.save(&config).await?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_modify_roundtrip() {
        let store = MemoryConfigStore::new();
        let saved = modify(&store, |c| c.api_endpoint = "https://api.fairfax.proof.com".into())
            .await
            .unwrap();
        assert_eq!(saved.api_endpoint, "https://api.fairfax.proof.com");
        assert_eq!(store.load().await.unwrap(), saved);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_modify_through_arc_dyn() {
        let store: std::sync::Arc<dyn ConfigStore> = std::sync::Arc::new(MemoryConfigStore::new());
        modify(&store, |c| c.api_key = Some("k".into())).await.unwrap();
        assert_eq!(store.load().await.unwrap().api_key.as_deref(), Some("k"));
        assert_eq!(store.name(), "memory");
    }
}
