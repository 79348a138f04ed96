//! Notaries: `/v1/notaries`.

use bytes::Bytes;
use serde_json::Value;

use crate::client::ProofClient;
use crate::error::Result;
use crate::query::{with_query, QueryBuilder, QueryParams};

/// Base path.
pub const NOTARIES_ENDPOINT: &str = "/v1/notaries";

/// Filters for [`list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListNotariesParams {
    /// Child organization to list, for parent-organization keys.
    pub organization_id: String,
    /// Two-letter commission state.
    pub us_state_abbr: String,
}

impl QueryParams for ListNotariesParams {
    fn write_query(&self, query: &mut QueryBuilder) {
        query
            .string("organization_id", &self.organization_id)
            .string("us_state_abbr", &self.us_state_abbr);
    }
}

fn item(id: &str) -> String {
    format!("{}/{}", NOTARIES_ENDPOINT, id)
}

/// List notaries.
pub async fn list(client: &ProofClient, params: &ListNotariesParams) -> Result<Bytes> {
    client.get(&with_query(NOTARIES_ENDPOINT, params)).await
}

/// Fetch one notary.
pub async fn get(client: &ProofClient, id: &str) -> Result<Bytes> {
    client.get(&item(id)).await
}

/// Create a notary account.
pub async fn create(client: &ProofClient, body: &Value) -> Result<Bytes> {
    client.post(NOTARIES_ENDPOINT, Some(body)).await
}

/// Update a notary account.
pub async fn update(client: &ProofClient, id: &str, body: &Value) -> Result<Bytes> {
    client.put(&item(id), Some(body)).await
}

/// Delete a notary account.
pub async fn delete(client: &ProofClient, id: &str) -> Result<Bytes> {
    client.delete(&item(id)).await
}
