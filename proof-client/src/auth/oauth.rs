//! Client-credentials token request.

use base64::Engine;
use tracing::{debug, info};

use crate::config::{oauth_token_url, CONTENT_TYPE_FORM, CONTENT_TYPE_JSON};
use crate::error::{Error, Result};
use crate::models::auth::{OAuthCredentials, OAuthToken};
use crate::models::config::Config;

/// A fully prepared token request. Building one performs no I/O.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenRequest {
    /// `{endpoint}/oauth/v2/token`
    pub url: String,
    /// `grant_type=client_credentials[&scope=...]`
    pub body: String,
    /// `Basic base64(client_id:client_secret)`
    pub authorization: String,
}

impl TokenRequest {
    /// Prepare the token request described by `config`.
    ///
    /// Fails with [`Error::OAuthNotEnabled`] when the OAuth section is absent
    /// or disabled, and [`Error::MissingCredential`] when either half of the
    /// client credentials is empty.
    pub fn prepare(config: &Config) -> Result<Self> {
        let oauth = config
            .oauth
            .as_ref()
            .filter(|o| o.enabled)
            .ok_or(Error::OAuthNotEnabled)?;
        Self::for_credentials(
            &config.api_endpoint,
            &OAuthCredentials {
                client_id: oauth.client_id.clone(),
                client_secret: oauth.client_secret.clone(),
                scope: oauth.scope.clone(),
            },
        )
    }

    /// Prepare a token request against `endpoint` for explicit credentials.
    pub fn for_credentials(endpoint: &str, credentials: &OAuthCredentials) -> Result<Self> {
        if credentials.client_id.is_empty() {
            return Err(Error::MissingCredential("client_id".into()));
        }
        if credentials.client_secret.is_empty() {
            return Err(Error::MissingCredential("client_secret".into()));
        }

        let mut form = url::form_urlencoded::Serializer::new(String::new());
        form.append_pair("grant_type", "client_credentials");
        if let Some(scope) = credentials.scope.as_deref().filter(|s| !s.is_empty()) {
            form.append_pair("scope", scope);
        }

        Ok(Self {
            url: oauth_token_url(endpoint),
            body: form.finish(),
            authorization: basic_authorization(&credentials.client_id, &credentials.client_secret),
        })
    }
}

impl std::fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRequest")
            .field("url", &self.url)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// `Basic` authorization value for a client id/secret pair.
pub fn basic_authorization(client_id: &str, client_secret: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD
        .encode(format!("{}:{}", client_id, client_secret));
    format!("Basic {}", encoded)
}

/// Send a prepared token request.
///
/// Only a `200 OK` counts as success. Any other status becomes
/// [`Error::AuthenticationFailed`] carrying the status and body.
pub async fn request_token(client: &reqwest::Client, request: &TokenRequest) -> Result<OAuthToken> {
    debug!(url = %request.url, "Requesting OAuth token");

    let response = client
        .post(&request.url)
        .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE_FORM)
        .header(reqwest::header::ACCEPT, CONTENT_TYPE_JSON)
        .header(reqwest::header::AUTHORIZATION, &request.authorization)
        .body(request.body.clone())
        .send()
        .await?;

    let status = response.status();
    let body = response.bytes().await?;

    if status != reqwest::StatusCode::OK {
        return Err(Error::AuthenticationFailed {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    let token = OAuthToken::from_response(&body)?;
    info!(expires_in = token.expires_in, "OAuth token obtained");
    Ok(token)
}
