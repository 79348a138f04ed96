//! Configuration constants for the Proof API.

use std::time::Duration;

/// Default API endpoint.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.proof.com";

/// Default round-trip timeout for API requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable that overrides the persisted API key.
pub const API_KEY_ENV: &str = "PROOF_API_KEY";

/// Directory under the user's home holding the config file.
pub const CONFIG_DIR_NAME: &str = ".proof-cli";

/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.json";

/// A token is only used while it has at least this much lifetime left.
pub const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(300); // 5 minutes

/// Token endpoint path, relative to the API endpoint.
pub const OAUTH_TOKEN_PATH: &str = "/oauth/v2/token";

/// Default content type and accept value.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Content type required by the SCIM user-provisioning endpoints.
pub const CONTENT_TYPE_SCIM: &str = "application/scim+json";

/// Content type of the token request body.
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Base timeout for multipart uploads, before the size-scaled allowance.
pub const UPLOAD_BASE_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for document downloads.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Timeout for an upload of `file_size` bytes: one extra second per 10 KiB.
pub fn upload_timeout(file_size: u64) -> Duration {
    UPLOAD_BASE_TIMEOUT + Duration::from_secs(file_size / 1024 / 10)
}

/// Join the configured endpoint and a request path.
///
/// The path is appended verbatim, so it may already carry a query string.
pub fn request_url(endpoint: &str, path: &str) -> String {
    format!("{}{}", endpoint, path)
}

/// Token endpoint URL for the given API endpoint.
pub fn oauth_token_url(endpoint: &str) -> String {
    request_url(endpoint, OAUTH_TOKEN_PATH)
}
