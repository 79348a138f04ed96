//! Business transactions: `/v1/transactions`.

use std::path::Path;

use base64::Engine;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::client::ProofClient;
use crate::error::Result;
use crate::query::{with_query, QueryBuilder, QueryParams};

/// Base path.
pub const TRANSACTIONS_ENDPOINT: &str = "/v1/transactions";

/// Document URL version requested on every single-transaction call.
pub const DOCUMENT_URL_VERSION: &str = "v2";

/// Filters for [`list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTransactionsParams {
    pub limit: u32,
    pub offset: u32,
    pub created_date_start: Option<DateTime<Utc>>,
    pub created_date_end: Option<DateTime<Utc>>,
    pub last_updated_date_start: Option<DateTime<Utc>>,
    pub last_updated_date_end: Option<DateTime<Utc>>,
    pub transaction_status: String,
    pub document_url_version: String,
}

impl QueryParams for ListTransactionsParams {
    fn write_query(&self, query: &mut QueryBuilder) {
        query
            .int("limit", self.limit)
            .int("offset", self.offset)
            .timestamp("created_date_start", self.created_date_start.as_ref())
            .timestamp("created_date_end", self.created_date_end.as_ref())
            .timestamp("last_updated_date_start", self.last_updated_date_start.as_ref())
            .timestamp("last_updated_date_end", self.last_updated_date_end.as_ref())
            .string("transaction_status", &self.transaction_status)
            .string("document_url_version", &self.document_url_version);
    }
}

/// `path?document_url_version=v2[&extra...]`
pub(crate) fn versioned(path: &str, extra: &[(&str, Option<&str>)]) -> String {
    let mut query = QueryBuilder::default();
    query.string("document_url_version", DOCUMENT_URL_VERSION);
    for (name, value) in extra {
        query.opt_string(name, *value);
    }
    query.append_to(path)
}

fn item(id: &str) -> String {
    format!("{}/{}", TRANSACTIONS_ENDPOINT, id)
}

/// List transactions.
pub async fn list(client: &ProofClient, params: &ListTransactionsParams) -> Result<Bytes> {
    client.get(&with_query(TRANSACTIONS_ENDPOINT, params)).await
}

/// Fetch one transaction.
pub async fn get(client: &ProofClient, id: &str) -> Result<Bytes> {
    client.get(&versioned(&item(id), &[])).await
}

/// Create a transaction from a caller-built body.
pub async fn create(client: &ProofClient, body: &Value) -> Result<Bytes> {
    client
        .post(&versioned(TRANSACTIONS_ENDPOINT, &[]), Some(body))
        .await
}

/// Replace a draft transaction.
pub async fn update(client: &ProofClient, id: &str, body: &Value) -> Result<Bytes> {
    client.put(&versioned(&item(id), &[]), Some(body)).await
}

/// Partially update a draft transaction.
pub async fn patch(client: &ProofClient, id: &str, body: &Value) -> Result<Bytes> {
    client.patch(&versioned(&item(id), &[]), Some(body)).await
}

/// Delete a transaction.
pub async fn delete(client: &ProofClient, id: &str) -> Result<Bytes> {
    client.delete(&item(id)).await
}

/// Mark a draft transaction ready for notarization.
pub async fn activate(client: &ProofClient, id: &str) -> Result<Bytes> {
    let path = versioned(&format!("{}/notarization_ready", item(id)), &[]);
    client.post::<Value>(&path, None).await
}

/// Recall a sent transaction.
pub async fn recall(client: &ProofClient, id: &str, reason: Option<&str>) -> Result<Bytes> {
    let path = versioned(&format!("{}/recall", item(id)), &[("recall_reason", reason)]);
    client.post::<Value>(&path, None).await
}

/// Resend the signer email.
pub async fn resend_email(client: &ProofClient, id: &str, message: Option<&str>) -> Result<Bytes> {
    let path = versioned(
        &format!("{}/send_email", item(id)),
        &[("message_to_signer", message)],
    );
    client.post::<Value>(&path, None).await
}

/// Resend the signer SMS.
pub async fn resend_sms(client: &ProofClient, id: &str, phone_number: Option<&str>) -> Result<Bytes> {
    let path = versioned(
        &format!("{}/send_sms", item(id)),
        &[("phone_number", phone_number)],
    );
    client.post::<Value>(&path, None).await
}

/// Notaries eligible to take a transaction.
pub async fn eligible_notaries(client: &ProofClient, id: &str) -> Result<Bytes> {
    client.get(&format!("{}/notaries", item(id))).await
}

/// Read a local file and base64-encode it for a JSON `resource`/`documents` field.
pub async fn document_resource(path: &Path) -> Result<String> {
    let content = tokio::fs::read(path).await?;
    Ok(base64::engine::general_purpose::STANDARD.encode(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query() {
        let params = ListTransactionsParams {
            limit: 20,
            transaction_status: "completed".into(),
            document_url_version: DOCUMENT_URL_VERSION.into(),
            ..Default::default()
        };
        assert_eq!(
            with_query(TRANSACTIONS_ENDPOINT, &params),
            "/v1/transactions?limit=20&transaction_status=completed&document_url_version=v2"
        );
    }

    #[test]
    fn test_versioned_paths() {
        assert_eq!(
            versioned("/v1/transactions/t1/recall", &[("recall_reason", Some("wrong signer"))]),
            "/v1/transactions/t1/recall?document_url_version=v2&recall_reason=wrong+signer"
        );
        assert_eq!(
            versioned("/v1/transactions/t1/recall", &[("recall_reason", None)]),
            "/v1/transactions/t1/recall?document_url_version=v2"
        );
    }

    #[tokio::test]
    async fn test_document_resource() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF").unwrap();
        assert_eq!(document_resource(&path).await.unwrap(), "JVBERg==");
    }
}
