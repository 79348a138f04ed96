//! File-based config storage with secure permissions.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::ConfigStore;
use crate::config::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::error::{Error, Result};
use crate::models::config::Config;

/// File permissions for the config file (Unix only): owner read/write.
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Directory permissions (Unix only): owner read/write/execute.
#[cfg(unix)]
const DIR_MODE: u32 = 0o700;

/// JSON config file storage with 0600 permissions.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Create storage at the specified path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create storage at the default path: `~/.proof-cli/config.json`
    pub fn default_path() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Cannot determine home directory".into()))?;
        Ok(Self::new(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> Result<()> {
        let Some(parent) = self.path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() || parent.exists() {
            return Ok(());
        }
        std::fs::create_dir_all(parent).map_err(|e| Error::storage_io(parent, e.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(parent, std::fs::Permissions::from_mode(DIR_MODE))
                .map_err(|e| Error::storage_io(parent, format!("chmod: {}", e)))?;
        }
        Ok(())
    }

    fn write_restricted(&self, content: &[u8]) -> Result<()> {
        use std::io::Write;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(FILE_MODE);
        }

        let mut file = options
            .open(&self.path)
            .map_err(|e| Error::storage_io(&self.path, e.to_string()))?;
        file.write_all(content)
            .map_err(|e| Error::storage_io(&self.path, e.to_string()))?;

        // `mode` only applies on creation; tighten files written by older versions.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(FILE_MODE))
                .map_err(|e| Error::storage_io(&self.path, format!("chmod: {}", e)))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::storage_io(&self.path, e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_json::from_str(&content).map_err(|e| {
            Error::StorageSerialization(format!("{}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, config: &Config) -> Result<()> {
        self.ensure_parent()?;
        let content = serde_json::to_vec_pretty(config)
            .map_err(|e| Error::StorageSerialization(e.to_string()))?;
        self.write_restricted(&content)?;
        debug!(path = %self.path.display(), "Config saved");
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::OAuthToken;
    use crate::models::config::OAuthConfig;
    use std::time::Duration;

    #[tokio::test]
    async fn test_missing_file_yields_defaults_without_creating_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".proof-cli").join("config.json");
        let store = FileConfigStore::new(&path);

        let config = store.load().await.unwrap();
        assert_eq!(config, Config::default());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_save_and_reload_full_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::new(dir.path().join("nested").join("config.json"));

        let config = Config {
            api_endpoint: "https://api.fairfax.proof.com".into(),
            timeout: Duration::from_secs(45),
            oauth: Some(OAuthConfig {
                enabled: true,
                client_id: "client".into(),
                client_secret: "secret".into(),
                scope: Some("transactions:read".into()),
            }),
            api_key: Some("key".into()),
            oauth_token: Some(OAuthToken {
                access_token: "access".into(),
                refresh_token: Some("refresh".into()),
                token_type: "Bearer".into(),
                expires_in: 3600,
                expires_at: chrono::Utc::now(),
                scope: Some("transactions:read".into()),
            }),
        };
        store.save(&config).await.unwrap();

        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded, config);
    }

    #[tokio::test]
    async fn test_empty_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "  \n").unwrap();

        let config = FileConfigStore::new(&path).load().await.unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileConfigStore::new(&path).load().await.unwrap_err();
        assert!(err.is_config_error());
        assert!(matches!(err, Error::StorageSerialization(_)));
    }

    #[tokio::test]
    async fn test_reads_go_style_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
  "api_endpoint": "https://api.proof.com",
  "timeout": 30000000000,
  "oauth": {"enabled": true, "client_id": "id", "client_secret": "secret"},
  "oauth_token": {
    "access_token": "a",
    "token_type": "Bearer",
    "expires_in": 3600,
    "expires_at": "2025-06-01T12:30:00.123456789-04:00"
  }
}"#,
        )
        .unwrap();

        let config = FileConfigStore::new(&path).load().await.unwrap();
        let token = config.oauth_token.unwrap();
        assert_eq!(token.expires_at.to_rfc3339(), "2025-06-01T16:30:00.123456789+00:00");
        assert!(config.oauth.unwrap().enabled);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_permissions_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileConfigStore::new(&path);
        store.save(&Config::default()).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
