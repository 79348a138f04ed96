//! Proof API header construction.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::config::{CONTENT_TYPE_JSON, CONTENT_TYPE_SCIM};
use crate::error::{Error, Result};

/// `ApiKey` in the lowercase form `HeaderName::from_static` requires.
const API_KEY: HeaderName = HeaderName::from_static("apikey");

/// How a request authenticates.
#[derive(Clone, Copy)]
pub enum Authorization<'a> {
    /// `ApiKey: <key>`
    ApiKey(&'a str),
    /// `Authorization: Bearer <token>`
    Bearer(&'a str),
}

impl std::fmt::Debug for Authorization<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(..)"),
            Self::Bearer(_) => f.write_str("Bearer(..)"),
        }
    }
}

/// Per-request content negotiation. Empty fields fall back to JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub content_type: Option<String>,
    pub accept: Option<String>,
}

impl RequestOptions {
    /// `application/scim+json` both ways, for the user-provisioning endpoints.
    pub fn scim() -> Self {
        Self {
            content_type: Some(CONTENT_TYPE_SCIM.to_string()),
            accept: Some(CONTENT_TYPE_SCIM.to_string()),
        }
    }

    fn content_type(&self) -> &str {
        self.content_type
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(CONTENT_TYPE_JSON)
    }

    fn accept(&self) -> &str {
        self.accept
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(CONTENT_TYPE_JSON)
    }
}

/// Header carrying the credential. Values are marked sensitive.
pub fn auth_header(auth: Authorization<'_>) -> Result<(HeaderName, HeaderValue)> {
    let (name, raw) = match auth {
        Authorization::ApiKey(key) => (API_KEY, key.to_string()),
        Authorization::Bearer(token) => (AUTHORIZATION, format!("Bearer {}", token)),
    };
    let mut value = HeaderValue::from_str(&raw)
        .map_err(|_| Error::Config(format!("{} contains characters not allowed in a header", name)))?;
    value.set_sensitive(true);
    Ok((name, value))
}

/// Build the headers for a Proof API request.
pub fn api_headers(auth: Authorization<'_>, options: &RequestOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let (name, value) = auth_header(auth)?;
    headers.insert(name, value);

    headers.insert(CONTENT_TYPE, negotiated(options.content_type())?);
    headers.insert(ACCEPT, negotiated(options.accept())?);

    Ok(headers)
}

fn negotiated(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::Config(format!("Invalid media type '{}'", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_headers() {
        let headers = api_headers(Authorization::ApiKey("abc"), &RequestOptions::default()).unwrap();
        assert_eq!(headers.get("ApiKey").unwrap(), "abc");
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn test_bearer_headers() {
        let headers = api_headers(Authorization::Bearer("tok"), &RequestOptions::default()).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
        assert!(headers.get("ApiKey").is_none());
    }

    #[test]
    fn test_scim_negotiation() {
        let headers = api_headers(Authorization::ApiKey("abc"), &RequestOptions::scim()).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/scim+json");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/scim+json");
    }

    #[test]
    fn test_empty_override_falls_back() {
        let options = RequestOptions {
            content_type: Some(String::new()),
            accept: Some("text/csv".into()),
        };
        let headers = api_headers(Authorization::ApiKey("abc"), &options).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(ACCEPT).unwrap(), "text/csv");
    }

    #[test]
    fn test_rejects_newline_in_key() {
        let err = api_headers(Authorization::ApiKey("abc\ndef"), &RequestOptions::default()).unwrap_err();
        assert!(err.is_config_error());
        assert!(!err.to_string().contains("abc"));
    }

    #[test]
    fn test_auth_value_is_sensitive() {
        let (_, value) = auth_header(Authorization::Bearer("tok")).unwrap();
        assert!(value.is_sensitive());
    }
}
