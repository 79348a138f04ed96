//! Error types for proof-client.

use std::path::PathBuf;

use bytes::Bytes;
use thiserror::Error;

/// The main error type for proof-client.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ────────────────────────────────────────────────────────
    /// Configuration is unusable (bad value, unknown home directory, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file could not be read or written.
    #[error("Config I/O error at {path}: {message}")]
    StorageIo {
        /// Path that caused the error.
        path: PathBuf,
        /// Error description.
        message: String,
    },

    /// Config file could not be parsed or encoded.
    #[error("Config serialization error: {0}")]
    StorageSerialization(String),

    // ── Credentials ──────────────────────────────────────────────────────────
    /// No usable credentials were found.
    #[error("{0}")]
    NotConfigured(String),

    /// An OAuth operation was requested while OAuth is not enabled.
    #[error("OAuth not enabled in configuration")]
    OAuthNotEnabled,

    /// A required credential field is empty.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// The token endpoint rejected the client credentials.
    #[error("OAuth authentication failed (status {status}): {body}")]
    AuthenticationFailed {
        /// HTTP status code returned by the token endpoint.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// The token endpoint answered 200 with a body that is not a token.
    #[error("Error parsing OAuth token: {0}")]
    TokenParse(#[source] serde_json::Error),

    // ── Transport ────────────────────────────────────────────────────────────
    /// DNS, connect, TLS, timeout or body-read failure.
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error (status {status}): {}", String::from_utf8_lossy(.body))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, untouched.
        body: Bytes,
    },

    /// A caller-supplied argument is malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Request body could not be encoded as JSON.
    #[error("Failed to marshal request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Local file error (upload source, download target).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for the config-file family of errors.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::StorageIo { .. } | Error::StorageSerialization(_)
        )
    }

    /// Returns true if the user has to run a setup command before retrying.
    #[must_use]
    pub fn requires_setup(&self) -> bool {
        matches!(
            self,
            Error::NotConfigured(_) | Error::OAuthNotEnabled | Error::MissingCredential(_)
        )
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } | Error::AuthenticationFailed { status, .. } => Some(*status),
            Error::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Creates a config I/O error.
    #[must_use]
    pub fn storage_io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StorageIo {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Convenience type alias.
pub type Result<T> = std::result::Result<T, Error>;
