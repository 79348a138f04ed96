//! Credential resolution and config mutations.
//!
//! Reads never touch the store. Every write is a full load-modify-save of the
//! config record through [`storage::modify`].

use std::time::Duration;

use tracing::info;

use crate::config::API_KEY_ENV;
use crate::error::{Error, Result};
use crate::models::auth::{CredentialSource, Credentials, OAuthCredentials};
use crate::models::config::{Config, OAuthConfig};
use crate::storage::{self, ConfigStore};

const NOT_CONFIGURED_MESSAGE: &str =
    "API key not found. Set PROOF_API_KEY environment variable or run 'proof config set-api-key'";

/// Read the API key override from the environment.
pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())
}

/// Resolve the active credentials for `config`, consulting `PROOF_API_KEY`.
pub fn resolve_credentials(config: &Config) -> Result<Credentials> {
    resolve_with(config, api_key_from_env().as_deref())
}

/// Resolve the active credentials given an explicit environment override.
///
/// OAuth wins whenever it is enabled. Otherwise a non-empty `env_key` beats
/// the persisted key.
pub fn resolve_with(config: &Config, env_key: Option<&str>) -> Result<Credentials> {
    if let Some(oauth) = config.oauth.as_ref().filter(|o| o.enabled) {
        return Ok(Credentials::OAuth(OAuthCredentials {
            client_id: oauth.client_id.clone(),
            client_secret: oauth.client_secret.clone(),
            scope: oauth.scope.clone().filter(|s| !s.is_empty()),
        }));
    }
    let (key, source) = lookup_api_key(config, env_key)?;
    Ok(Credentials::ApiKey { key, source })
}

/// Resolve an API key regardless of the OAuth setting.
///
/// Used by the upload and download paths, which always authenticate with `ApiKey`.
pub fn resolve_api_key(config: &Config) -> Result<String> {
    resolve_api_key_with(config, api_key_from_env().as_deref())
}

/// Resolve an API key regardless of the OAuth setting, given an explicit override.
pub fn resolve_api_key_with(config: &Config, env_key: Option<&str>) -> Result<String> {
    lookup_api_key(config, env_key).map(|(key, _)| key)
}

fn lookup_api_key(
    config: &Config,
    env_key: Option<&str>,
) -> Result<(String, CredentialSource)> {
    if let Some(key) = env_key.filter(|k| !k.is_empty()) {
        return Ok((key.to_string(), CredentialSource::Environment));
    }
    match config.persisted_api_key() {
        Some(key) => Ok((key.to_string(), CredentialSource::ConfigFile)),
        None => Err(Error::NotConfigured(NOT_CONFIGURED_MESSAGE.into())),
    }
}

/// Persist a static API key.
pub async fn set_api_key<S: ConfigStore + ?Sized>(store: &S, api_key: &str) -> Result<Config> {
    let api_key = api_key.to_string();
    let config = storage::modify(store, move |c| c.api_key = Some(api_key)).await?;
    info!(store = store.name(), "API key saved");
    Ok(config)
}

/// Store OAuth client credentials and switch OAuth on.
pub async fn set_oauth<S: ConfigStore + ?Sized>(
    store: &S,
    client_id: &str,
    client_secret: &str,
    scope: Option<&str>,
) -> Result<Config> {
    if client_id.is_empty() {
        return Err(Error::MissingCredential("client_id".into()));
    }
    if client_secret.is_empty() {
        return Err(Error::MissingCredential("client_secret".into()));
    }
    let oauth = OAuthConfig {
        enabled: true,
        client_id: client_id.to_string(),
        client_secret: client_secret.to_string(),
        scope: scope.filter(|s| !s.is_empty()).map(str::to_string),
    };
    let config = storage::modify(store, move |c| c.oauth = Some(oauth)).await?;
    info!(store = store.name(), "OAuth credentials saved");
    Ok(config)
}

/// Switch OAuth off, keeping the stored client credentials.
pub async fn disable_oauth<S: ConfigStore + ?Sized>(store: &S) -> Result<Config> {
    let config = storage::modify(store, |c| {
        if let Some(oauth) = c.oauth.as_mut() {
            oauth.enabled = false;
        }
    })
    .await?;
    info!(store = store.name(), "OAuth disabled");
    Ok(config)
}

/// Change the base URL requests are sent to.
pub async fn set_endpoint<S: ConfigStore + ?Sized>(store: &S, endpoint: &str) -> Result<Config> {
    let parsed = url::Url::parse(endpoint)
        .map_err(|e| Error::Config(format!("Invalid endpoint '{}': {}", endpoint, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "Invalid endpoint '{}': scheme must be http or https",
            endpoint
        )));
    }
    let endpoint = endpoint.to_string();
    storage::modify(store, move |c| c.api_endpoint = endpoint).await
}

/// Change the request timeout. Zero disables the timeout.
pub async fn set_timeout<S: ConfigStore + ?Sized>(store: &S, seconds: u64) -> Result<Config> {
    storage::modify(store, move |c| c.timeout = Duration::from_secs(seconds)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryConfigStore;

    fn oauth_config(enabled: bool) -> OAuthConfig {
        OAuthConfig {
            enabled,
            client_id: "client".into(),
            client_secret: "secret".into(),
            scope: None,
        }
    }

    #[test]
    fn test_env_key_beats_persisted_key() {
        let config = Config {
            api_key: Some("persisted".into()),
            ..Config::default()
        };
        let creds = resolve_with(&config, Some("abc")).unwrap();
        assert_eq!(
            creds,
            Credentials::ApiKey {
                key: "abc".into(),
                source: CredentialSource::Environment,
            }
        );
    }

    #[test]
    fn test_empty_env_key_falls_back_to_config() {
        let config = Config {
            api_key: Some("persisted".into()),
            ..Config::default()
        };
        let creds = resolve_with(&config, Some("")).unwrap();
        assert_eq!(
            creds,
            Credentials::ApiKey {
                key: "persisted".into(),
                source: CredentialSource::ConfigFile,
            }
        );
    }

    #[test]
    fn test_oauth_wins_when_enabled() {
        let config = Config {
            api_key: Some("persisted".into()),
            oauth: Some(oauth_config(true)),
            ..Config::default()
        };
        let creds = resolve_with(&config, Some("abc")).unwrap();
        assert!(matches!(creds, Credentials::OAuth(ref o) if o.client_id == "client"));
    }

    #[test]
    fn test_disabled_oauth_uses_api_key() {
        let config = Config {
            api_key: Some("persisted".into()),
            oauth: Some(oauth_config(false)),
            ..Config::default()
        };
        assert!(matches!(
            resolve_with(&config, None).unwrap(),
            Credentials::ApiKey { .. }
        ));
    }

    #[test]
    fn test_nothing_configured() {
        let err = resolve_with(&Config::default(), None).unwrap_err();
        assert!(err.requires_setup());
        assert!(err.to_string().contains("proof config set-api-key"));
    }

    #[test]
    fn test_api_key_ignores_oauth() {
        let config = Config {
            api_key: Some("persisted".into()),
            oauth: Some(oauth_config(true)),
            ..Config::default()
        };
        assert_eq!(resolve_api_key_with(&config, None).unwrap(), "persisted");
        assert_eq!(resolve_api_key_with(&config, Some("env")).unwrap(), "env");

        let bare = Config {
            oauth: Some(oauth_config(true)),
            ..Config::default()
        };
        assert!(resolve_api_key_with(&bare, None).unwrap_err().requires_setup());
    }

    #[tokio::test]
    async fn test_disable_oauth_keeps_client_credentials() {
        let store = MemoryConfigStore::new();
        set_oauth(&store, "client", "secret", Some("read")).await.unwrap();
        let config = disable_oauth(&store).await.unwrap();

        let oauth = config.oauth.unwrap();
        assert!(!oauth.enabled);
        assert_eq!(oauth.client_id, "client");
        assert_eq!(oauth.client_secret, "secret");
        assert_eq!(oauth.scope.as_deref(), Some("read"));
    }

    #[tokio::test]
    async fn test_disable_oauth_without_section_is_noop() {
        let store = MemoryConfigStore::new();
        let config = disable_oauth(&store).await.unwrap();
        assert!(config.oauth.is_none());
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_set_oauth_requires_both_halves() {
        let store = MemoryConfigStore::new();
        let err = set_oauth(&store, "client", "", None).await.unwrap_err();
        assert!(matches!(err, Error::MissingCredential(ref f) if f == "client_secret"));
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_writes_preserve_other_fields() {
        let store = MemoryConfigStore::new();
        set_api_key(&store, "key").await.unwrap();
        set_endpoint(&store, "https://api.fairfax.proof.com").await.unwrap();
        let config = set_timeout(&store, 90).await.unwrap();

        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.api_endpoint, "https://api.fairfax.proof.com");
        assert_eq!(config.timeout, Duration::from_secs(90));
    }

    #[tokio::test]
    async fn test_set_endpoint_rejects_garbage() {
        let store = MemoryConfigStore::new();
        assert!(set_endpoint(&store, "not a url").await.unwrap_err().is_config_error());
        assert!(set_endpoint(&store, "ftp://proof.com").await.is_err());
        assert_eq!(store.save_count(), 0);
    }
}
