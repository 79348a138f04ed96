//! Token lifecycle manager.
//!
//! Reads the persisted token from the config store on every call, requests a
//! new one when it is missing or inside the expiry buffer, and writes the
//! replacement back.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::auth::{OAuthToken, TokenState};
use crate::models::config::Config;
use crate::storage::{self, ConfigStore};

use super::oauth::{request_token, TokenRequest};

/// Manages the OAuth client-credentials token lifecycle.
pub struct OAuthTokenManager {
    /// HTTP client for token requests.
    client: reqwest::Client,
    /// Where the config record and token live.
    store: Arc<dyn ConfigStore>,
}

impl OAuthTokenManager {
    /// Create a manager backed by `store`.
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            store,
        }
    }

    /// Set the HTTP client (useful for testing or custom TLS config).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Lifecycle state of the persisted token right now.
    pub async fn token_state(&self) -> Result<TokenState> {
        let config = self.store.load().await?;
        Ok(TokenState::of(config.oauth_token.as_ref(), Utc::now()))
    }

    /// Return a token that is valid for at least the expiry buffer.
    ///
    /// A valid persisted token is returned without any network call. A
    /// missing or expired token triggers exactly one token request, and the
    /// result is persisted before it is returned.
    pub async fn ensure_valid_token(&self) -> Result<OAuthToken> {
        let config = self.store.load().await?;
        if !config.oauth_enabled() {
            return Err(Error::OAuthNotEnabled);
        }

        let state = TokenState::of(config.oauth_token.as_ref(), Utc::now());
        if state == TokenState::Valid {
            if let Some(token) = config.oauth_token {
                debug!("Using persisted OAuth token");
                return Ok(token);
            }
        }

        debug!(%state, "OAuth token needs refresh");
        self.refresh(&config).await
    }

    /// Always request a fresh token, regardless of the persisted one.
    pub async fn force_refresh(&self) -> Result<OAuthToken> {
        info!("Force refresh requested");
        let config = self.store.load().await?;
        self.refresh(&config).await
    }

    async fn refresh(&self, config: &Config) -> Result<OAuthToken> {
        let request = TokenRequest::prepare(config)?;
        let token = request_token(&self.client, &request).await?;

        let persisted = token.clone();
        storage::modify(&*self.store, move |c| c.oauth_token = Some(persisted)).await?;
        info!(store = self.store.name(), expires_at = %token.expires_at, "OAuth token persisted");

        Ok(token)
    }
}

impl std::fmt::Debug for OAuthTokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthTokenManager")
            .field("store", &self.store.name())
            .finish()
    }
}
