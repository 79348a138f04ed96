//! Third-party integrations: `/v1/integrations`.

use bytes::Bytes;
use serde::Serialize;

use crate::client::ProofClient;
use crate::error::Result;

/// Base path.
pub const INTEGRATIONS_ENDPOINT: &str = "/v1/integrations";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrationConfiguration {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub account_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub environment: String,
}

/// Body for [`create`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrationParams {
    /// `ADOBE` or `DOCUTECH`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub organization_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<IntegrationConfiguration>,
}

impl IntegrationParams {
    /// Build params, attaching a configuration only when a field is set.
    pub fn new(name: &str, organization_id: &str, account_id: &str, environment: &str) -> Self {
        let configuration = (!account_id.is_empty() || !environment.is_empty()).then(|| {
            IntegrationConfiguration {
                account_id: account_id.to_string(),
                environment: environment.to_string(),
            }
        });
        Self {
            name: name.to_string(),
            organization_id: organization_id.to_string(),
            configuration,
        }
    }
}

/// Create an integration.
pub async fn create(client: &ProofClient, params: &IntegrationParams) -> Result<Bytes> {
    client.post(INTEGRATIONS_ENDPOINT, Some(params)).await
}
