//! Persisted configuration record.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::auth::OAuthToken;
use crate::config::{DEFAULT_API_ENDPOINT, DEFAULT_TIMEOUT};

/// The single configuration record stored at `~/.proof-cli/config.json`.
///
/// Loaded fresh for every operation and rewritten whole on save.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL every request path is appended to.
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
    /// Round-trip timeout. Stored as integer nanoseconds.
    #[serde(default = "default_timeout", with = "duration_nanos")]
    pub timeout: Duration,
    /// OAuth client credentials. Kept when OAuth is disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth: Option<OAuthConfig>,
    /// Static API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Last token obtained from the token endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_token: Option<OAuthToken>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            timeout: DEFAULT_TIMEOUT,
            oauth: None,
            api_key: None,
            oauth_token: None,
        }
    }
}

impl Config {
    /// True when the OAuth section exists and is switched on.
    #[must_use]
    pub fn oauth_enabled(&self) -> bool {
        self.oauth.as_ref().is_some_and(|o| o.enabled)
    }

    /// The persisted API key, ignoring empty strings.
    pub fn persisted_api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_endpoint", &self.api_endpoint)
            .field("timeout", &self.timeout)
            .field("oauth", &self.oauth)
            .field("has_api_key", &self.persisted_api_key().is_some())
            .field("oauth_token", &self.oauth_token)
            .finish()
    }
}

/// OAuth client-credentials settings.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("enabled", &self.enabled)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .finish()
    }
}

fn default_api_endpoint() -> String {
    DEFAULT_API_ENDPOINT.to_string()
}

const fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

/// `Duration` as a plain integer count of nanoseconds.
mod duration_nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(value.as_nanos()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let nanos = i64::deserialize(deserializer)?;
        if nanos < 0 {
            return Err(serde::de::Error::custom("timeout must not be negative"));
        }
        Ok(Duration::from_nanos(nanos as u64))
    }
}
