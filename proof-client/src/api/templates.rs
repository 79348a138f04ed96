//! Business templates: `/v1/templates`.

use bytes::Bytes;

use crate::client::ProofClient;
use crate::error::Result;
use crate::query::{with_query, QueryBuilder, QueryParams};

/// Base path.
pub const TEMPLATES_ENDPOINT: &str = "/v1/templates";

/// Paging for [`list`]. Zero leaves the server default (100, max 1000).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTemplatesParams {
    pub limit: u32,
    pub offset: u32,
}

impl QueryParams for ListTemplatesParams {
    fn write_query(&self, query: &mut QueryBuilder) {
        query.int("limit", self.limit).int("offset", self.offset);
    }
}

/// List document templates.
pub async fn list(client: &ProofClient, params: &ListTemplatesParams) -> Result<Bytes> {
    client.get(&with_query(TEMPLATES_ENDPOINT, params)).await
}
