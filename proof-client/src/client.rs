//! Main client entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, info};

use crate::auth::OAuthTokenManager;
use crate::config::request_url;
use crate::credentials;
use crate::error::{Error, Result};
use crate::models::auth::{Credentials, OAuthToken, TokenState};
use crate::models::config::Config;
use crate::storage::{ConfigStore, FileConfigStore};
use crate::transport::{Authorization, HttpExecutor, MultipartUpload, RequestOptions};

/// How business requests are authorized.
enum Authenticator {
    ApiKey(String),
    OAuth(OAuthTokenManager),
}

/// Proof API client.
///
/// Holds the config snapshot taken at build time. The OAuth token itself is
/// read from and written to the store on every request that needs it.
///
/// # Examples
///
/// ```rust,no_run
/// use proof_client::ProofClient;
///
/// # async fn example() -> proof_client::Result<()> {
/// let client = ProofClient::builder().build().await?;
/// let body = client.get("/v1/transactions?limit=5").await?;
/// println!("{}", String::from_utf8_lossy(&body));
/// # Ok(())
/// # }
/// ```
pub struct ProofClient {
    config: Config,
    credentials: Credentials,
    store: Arc<dyn ConfigStore>,
    http: HttpExecutor,
    auth: Authenticator,
    env_api_key: Option<String>,
}

impl ProofClient {
    /// Create a builder for configuring the client.
    pub fn builder() -> ProofClientBuilder {
        ProofClientBuilder::new()
    }

    /// Send a request with an optional JSON body and explicit content negotiation.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> Result<Bytes> {
        let body = body
            .map(|b| serde_json::to_vec(b).map_err(Error::Serialize))
            .transpose()?;

        match &self.auth {
            Authenticator::ApiKey(key) => {
                self.http
                    .execute(method, path, body, Authorization::ApiKey(key), options)
                    .await
            }
            Authenticator::OAuth(manager) => {
                let token = manager.ensure_valid_token().await?;
                self.http
                    .execute(
                        method,
                        path,
                        body,
                        Authorization::Bearer(&token.access_token),
                        options,
                    )
                    .await
            }
        }
    }

    /// `GET path`
    pub async fn get(&self, path: &str) -> Result<Bytes> {
        self.request::<()>(Method::GET, path, None, &RequestOptions::default())
            .await
    }

    /// `POST path` with an optional JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> Result<Bytes> {
        self.request(Method::POST, path, body, &RequestOptions::default())
            .await
    }

    /// `PUT path` with an optional JSON body.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> Result<Bytes> {
        self.request(Method::PUT, path, body, &RequestOptions::default())
            .await
    }

    /// `PATCH path` with an optional JSON body.
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> Result<Bytes> {
        self.request(Method::PATCH, path, body, &RequestOptions::default())
            .await
    }

    /// `DELETE path`
    pub async fn delete(&self, path: &str) -> Result<Bytes> {
        self.request::<()>(Method::DELETE, path, None, &RequestOptions::default())
            .await
    }

    /// Request a fresh OAuth token and persist it, ignoring any valid one.
    pub async fn test_oauth(&self) -> Result<OAuthToken> {
        match &self.auth {
            Authenticator::OAuth(manager) => manager.force_refresh().await,
            Authenticator::ApiKey(_) => Err(Error::OAuthNotEnabled),
        }
    }

    /// State of the persisted OAuth token, or `None` in API-key mode.
    pub async fn token_state(&self) -> Result<Option<TokenState>> {
        match &self.auth {
            Authenticator::OAuth(manager) => manager.token_state().await.map(Some),
            Authenticator::ApiKey(_) => Ok(None),
        }
    }

    /// Upload a local file as `multipart/form-data` to `path`.
    ///
    /// Always authenticates with the API key, even when OAuth is enabled.
    pub async fn upload(&self, path: &str, upload: &MultipartUpload) -> Result<Bytes> {
        let api_key = self.api_key()?;
        let url = request_url(self.http.endpoint(), path);
        self.http.upload_multipart(&url, &api_key, upload).await
    }

    /// Download an absolute URL to `output` using the API key.
    pub async fn download_to_file(&self, url: &str, output: &Path) -> Result<u64> {
        let api_key = self.api_key()?;
        self.http.download_to_file(url, &api_key, output).await
    }

    /// The config snapshot this client was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The credential mode in use.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The backing config store.
    pub fn store(&self) -> &Arc<dyn ConfigStore> {
        &self.store
    }

    /// The base URL requests go to.
    pub fn endpoint(&self) -> &str {
        self.http.endpoint()
    }

    fn api_key(&self) -> Result<String> {
        credentials::resolve_api_key_with(&self.config, self.env_api_key.as_deref())
    }
}

impl std::fmt::Debug for ProofClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofClient")
            .field("endpoint", &self.http.endpoint())
            .field("credentials", &self.credentials)
            .field("store", &self.store.name())
            .finish()
    }
}

/// Builder for [`ProofClient`].
#[derive(Default)]
pub struct ProofClientBuilder {
    config_file: Option<PathBuf>,
    store: Option<Arc<dyn ConfigStore>>,
    api_key_override: Option<Option<String>>,
    reqwest_client: Option<reqwest::Client>,
}

impl ProofClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read config from this file instead of `~/.proof-cli/config.json`.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Set a config store backend. Takes precedence over [`Self::config_file`].
    pub fn store(mut self, store: Arc<dyn ConfigStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use this value in place of `PROOF_API_KEY`. `None` ignores the environment.
    pub fn api_key_override(mut self, key: Option<String>) -> Self {
        self.api_key_override = Some(key);
        self
    }

    /// Set a custom reqwest client. The configured timeout is not applied to it.
    pub fn reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.reqwest_client = Some(client);
        self
    }

    /// Build the client, loading config and resolving credentials.
    ///
    /// In API-key mode a missing key fails here with [`Error::NotConfigured`].
    /// In OAuth mode no token is requested until the first call needs one.
    pub async fn build(self) -> Result<ProofClient> {
        let store: Arc<dyn ConfigStore> = match (self.store, self.config_file) {
            (Some(store), _) => store,
            (None, Some(path)) => Arc::new(FileConfigStore::new(path)),
            (None, None) => Arc::new(FileConfigStore::default_path()?),
        };

        let config = store.load().await?;
        let env_api_key = match self.api_key_override {
            Some(key) => key,
            None => credentials::api_key_from_env(),
        };
        let credentials = credentials::resolve_with(&config, env_api_key.as_deref())?;

        let http = match self.reqwest_client {
            Some(client) => HttpExecutor::with_client(client, config.api_endpoint.clone()),
            None => HttpExecutor::new(config.api_endpoint.clone(), config.timeout)?,
        };

        let auth = match &credentials {
            Credentials::ApiKey { key, source } => {
                debug!(%source, "Using API key authentication");
                Authenticator::ApiKey(key.clone())
            }
            Credentials::OAuth(creds) => {
                debug!(client_id = %creds.client_id, "Using OAuth authentication");
                Authenticator::OAuth(
                    OAuthTokenManager::new(Arc::clone(&store)).with_client(http.client().clone()),
                )
            }
        };

        info!(endpoint = %config.api_endpoint, store = store.name(), "ProofClient initialized");
        Ok(ProofClient {
            config,
            credentials,
            store,
            http,
            auth,
            env_api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::OAuthConfig;
    use crate::storage::MemoryConfigStore;

    #[tokio::test]
    async fn test_build_without_credentials_fails() {
        let err = ProofClient::builder()
            .store(Arc::new(MemoryConfigStore::new()))
            .api_key_override(None)
            .build()
            .await
            .unwrap_err();
        assert!(err.requires_setup());
    }

    #[tokio::test]
    async fn test_build_with_env_key() {
        let client = ProofClient::builder()
            .store(Arc::new(MemoryConfigStore::new()))
            .api_key_override(Some("abc".into()))
            .build()
            .await
            .unwrap();
        assert!(matches!(client.credentials(), Credentials::ApiKey { key, .. } if key == "abc"));
        assert_eq!(client.endpoint(), "https://api.proof.com");
        assert!(client.token_state().await.unwrap().is_none());
        assert!(matches!(client.test_oauth().await, Err(Error::OAuthNotEnabled)));
    }

    #[tokio::test]
    async fn test_oauth_build_is_lazy() {
        let store = Arc::new(MemoryConfigStore::with_config(Config {
            oauth: Some(OAuthConfig {
                enabled: true,
                client_id: "client".into(),
                client_secret: "secret".into(),
                scope: None,
            }),
            ..Config::default()
        }));
        let client = ProofClient::builder()
            .store(store.clone())
            .api_key_override(None)
            .build()
            .await
            .unwrap();
        assert!(matches!(client.credentials(), Credentials::OAuth(_)));
        assert_eq!(client.token_state().await.unwrap(), Some(TokenState::NoToken));
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_requires_api_key_in_oauth_mode() {
        let store = Arc::new(MemoryConfigStore::with_config(Config {
            oauth: Some(OAuthConfig {
                enabled: true,
                client_id: "client".into(),
                client_secret: "secret".into(),
                scope: None,
            }),
            ..Config::default()
        }));
        let client = ProofClient::builder()
            .store(store)
            .api_key_override(None)
            .build()
            .await
            .unwrap();
        let err = client
            .upload("/mortgage/v2/transactions/t1/documents", &MultipartUpload::new("x.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotConfigured(_)));
    }
}
