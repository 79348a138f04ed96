//! Authentication-related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TOKEN_EXPIRY_BUFFER;
use crate::error::{Error, Result};

/// An access token obtained through the client-credentials grant.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds as reported by the token endpoint.
    #[serde(default)]
    pub expires_in: i64,
    /// Absolute expiry, stamped locally when the token was received.
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Body returned by `POST /oauth/v2/token`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: String,
    #[serde(default)]
    expires_in: i64,
    #[serde(default)]
    scope: Option<String>,
}

impl OAuthToken {
    /// Parse a token endpoint response, stamping `expires_at` from the current time.
    pub fn from_response(body: &[u8]) -> Result<Self> {
        Self::from_response_at(body, Utc::now())
    }

    /// Parse a token endpoint response as if it was received at `received_at`.
    pub fn from_response_at(body: &[u8], received_at: DateTime<Utc>) -> Result<Self> {
        let response: TokenResponse = serde_json::from_slice(body).map_err(Error::TokenParse)?;
        Ok(Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.filter(|t| !t.is_empty()),
            token_type: response.token_type,
            expires_in: response.expires_in,
            expires_at: received_at + chrono::Duration::seconds(response.expires_in),
            scope: response.scope.filter(|s| !s.is_empty()),
        })
    }

    /// True while the token has more than the expiry buffer left at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let buffer = chrono::Duration::seconds(TOKEN_EXPIRY_BUFFER.as_secs() as i64);
        now + buffer < self.expires_at
    }

    /// True while the token can be used for a request started now.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// True once the token is within the expiry buffer or past `expires_at`.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        !self.is_valid()
    }
}

impl std::fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthToken")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("scope", &self.scope)
            .finish()
    }
}

/// Lifecycle state of the persisted token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// Nothing has been persisted yet.
    NoToken,
    /// Usable without contacting the token endpoint.
    Valid,
    /// Inside the expiry buffer or already past `expires_at`.
    Expired,
}

impl TokenState {
    /// Classify an optional token at `now`.
    pub fn of(token: Option<&OAuthToken>, now: DateTime<Utc>) -> Self {
        match token {
            None => Self::NoToken,
            Some(t) if t.is_valid_at(now) => Self::Valid,
            Some(_) => Self::Expired,
        }
    }
}

impl std::fmt::Display for TokenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoToken => write!(f, "not present"),
            Self::Valid => write!(f, "valid"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// Where an API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// The `PROOF_API_KEY` environment variable.
    Environment,
    /// The persisted config file.
    ConfigFile,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Environment => write!(f, "environment"),
            Self::ConfigFile => write!(f, "config file"),
        }
    }
}

/// OAuth client-credential pair.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub scope: Option<String>,
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// The active credential mode. OAuth wins whenever it is enabled.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Static key sent in the `ApiKey` header.
    ApiKey {
        key: String,
        source: CredentialSource,
    },
    /// Client credentials exchanged for a bearer token.
    OAuth(OAuthCredentials),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey { source, .. } => f
                .debug_struct("ApiKey")
                .field("source", source)
                .finish_non_exhaustive(),
            Self::OAuth(creds) => f.debug_tuple("OAuth").field(creds).finish(),
        }
    }
}
