//! Business documents: `/v1/documents` and the transaction-scoped document routes.

use bytes::Bytes;
use serde_json::Value;

use super::transactions::{versioned, TRANSACTIONS_ENDPOINT};
use crate::client::ProofClient;
use crate::error::Result;

/// Base path.
pub const DOCUMENTS_ENDPOINT: &str = "/v1/documents";

fn item(id: &str) -> String {
    format!("{}/{}", DOCUMENTS_ENDPOINT, id)
}

/// Attach a document to a transaction. `body` carries `resource` and options.
pub async fn add(client: &ProofClient, transaction_id: &str, body: &Value) -> Result<Bytes> {
    let path = versioned(
        &format!("{}/{}/documents", TRANSACTIONS_ENDPOINT, transaction_id),
        &[],
    );
    client.post(&path, Some(body)).await
}

/// Fetch a document of a transaction. `encoding` is `base64` or `uri`.
pub async fn get(
    client: &ProofClient,
    transaction_id: &str,
    document_id: &str,
    encoding: Option<&str>,
) -> Result<Bytes> {
    let path = versioned(
        &format!(
            "{}/{}/documents/{}",
            TRANSACTIONS_ENDPOINT, transaction_id, document_id
        ),
        &[("encoding", encoding)],
    );
    client.get(&path).await
}

/// Replace a document's settings.
pub async fn update(client: &ProofClient, document_id: &str, body: &Value) -> Result<Bytes> {
    client
        .put(&versioned(&item(document_id), &[]), Some(body))
        .await
}

/// Partially update a document's settings.
pub async fn patch(client: &ProofClient, document_id: &str, body: &Value) -> Result<Bytes> {
    client
        .patch(&versioned(&item(document_id), &[]), Some(body))
        .await
}

/// Delete a document.
pub async fn delete(client: &ProofClient, document_id: &str) -> Result<Bytes> {
    client.delete(&item(document_id)).await
}
