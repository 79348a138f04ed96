//! `proof config ...`

use anyhow::bail;
use chrono::{SecondsFormat, Utc};
use clap::Subcommand;
use tracing::debug;

use proof_client::credentials;
use proof_client::{Config, OAuthToken, TokenState};

use super::Context;
use crate::output::Output;

const OAUTH_SETUP_HINT: &str =
    "OAuth is not enabled. Use 'proof config set-oauth' to configure OAuth credentials.";

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the current configuration. Secrets are never printed.
    Get,
    /// Set the API endpoint.
    SetEndpoint { endpoint: String },
    /// Set the request timeout in seconds. 0 disables it.
    SetTimeout { seconds: u64 },
    /// Store an API key.
    SetApiKey { api_key: String },
    /// Store OAuth client credentials and enable OAuth.
    #[command(name = "set-oauth")]
    SetOAuth {
        client_id: String,
        client_secret: String,
        /// OAuth scope.
        #[arg(long)]
        scope: Option<String>,
    },
    /// Disable OAuth and fall back to the API key. Credentials are kept.
    #[command(name = "disable-oauth")]
    DisableOAuth,
    /// Request a fresh OAuth token and store it.
    #[command(name = "test-oauth")]
    TestOAuth,
}

pub async fn handle(action: ConfigAction, ctx: &Context) -> anyhow::Result<Output> {
    let store = ctx.store();
    debug!(store = store.name(), "Config command");

    match action {
        ConfigAction::Get => {
            let config = store.load().await?;
            Ok(Output::Lines(report(&config, Utc::now())))
        }
        ConfigAction::SetEndpoint { endpoint } => {
            credentials::set_endpoint(&**store, &endpoint).await?;
            Ok(Output::line(format!("API endpoint set to: {endpoint}")))
        }
        ConfigAction::SetTimeout { seconds } => {
            credentials::set_timeout(&**store, seconds).await?;
            Ok(Output::line(format!("Timeout set to: {seconds} seconds")))
        }
        ConfigAction::SetApiKey { api_key } => {
            credentials::set_api_key(&**store, &api_key).await?;
            Ok(Output::line("API key set successfully"))
        }
        ConfigAction::SetOAuth {
            client_id,
            client_secret,
            scope,
        } => {
            credentials::set_oauth(&**store, &client_id, &client_secret, scope.as_deref()).await?;
            let mut lines = vec![
                "OAuth credentials configured successfully".to_string(),
                format!("Client ID: {client_id}"),
            ];
            if let Some(scope) = scope.filter(|s| !s.is_empty()) {
                lines.push(format!("Scope: {scope}"));
            }
            Ok(Output::Lines(lines))
        }
        ConfigAction::DisableOAuth => {
            credentials::disable_oauth(&**store).await?;
            Ok(Output::line("OAuth authentication disabled"))
        }
        ConfigAction::TestOAuth => {
            let config = store.load().await?;
            if !config.oauth_enabled() {
                bail!(OAUTH_SETUP_HINT);
            }
            let client = ctx.client().await?;
            let token = client.test_oauth().await?;
            Ok(Output::Lines(token_report(&token)))
        }
    }
}

/// Lines printed by `config get`.
pub fn report(config: &Config, now: chrono::DateTime<Utc>) -> Vec<String> {
    let mut lines = vec![
        format!("API Endpoint: {}", config.api_endpoint),
        format!("Timeout: {:?}", config.timeout),
    ];

    let key_state = if config.persisted_api_key().is_some() {
        "configured"
    } else {
        "not configured"
    };
    lines.push(format!("API Key: {key_state}"));

    match config.oauth.as_ref() {
        Some(oauth) if oauth.enabled => {
            lines.push("OAuth Enabled: true".to_string());
            lines.push(format!("OAuth Client ID: {}", oauth.client_id));
            if let Some(scope) = oauth.scope.as_deref().filter(|s| !s.is_empty()) {
                lines.push(format!("OAuth Scope: {scope}"));
            }
            let token = config.oauth_token.as_ref();
            let token_line = match TokenState::of(token, now) {
                TokenState::NoToken => "not present".to_string(),
                TokenState::Expired => "expired".to_string(),
                TokenState::Valid => match token {
                    Some(token) => format!("valid until {}", rfc3339(token)),
                    None => "not present".to_string(),
                },
            };
            lines.push(format!("OAuth Token: {token_line}"));
        }
        _ => lines.push("OAuth Enabled: false".to_string()),
    }

    lines
}

fn token_report(token: &OAuthToken) -> Vec<String> {
    let mut lines = vec![
        "OAuth authentication successful!".to_string(),
        format!("Token Type: {}", token.token_type),
        format!("Expires At: {}", rfc3339(token)),
    ];
    if let Some(scope) = token.scope.as_deref() {
        lines.push(format!("Scope: {scope}"));
    }
    lines
}

fn rfc3339(token: &OAuthToken) -> String {
    token.expires_at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
