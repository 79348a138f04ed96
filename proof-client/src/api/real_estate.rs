//! Real estate (mortgage) transactions, documents, webhooks and address
//! verification: `/mortgage/v2`.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::api::webhooks::WebhookParams;
use crate::client::ProofClient;
use crate::error::{Error, Result};
use crate::query::{with_query, QueryBuilder, QueryParams};
use crate::transport::MultipartUpload;

pub const TRANSACTIONS_ENDPOINT: &str = "/mortgage/v2/transactions";
pub const DOCUMENTS_ENDPOINT: &str = "/mortgage/v2/documents";
pub const WEBHOOKS_ENDPOINT: &str = "/mortgage/v2/webhooks";

/// Filters for [`list_transactions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTransactionsParams {
    pub limit: u32,
    pub offset: u32,
    pub organization_id: String,
    pub loan_number: String,
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
            .string("organization_id", &self.organization_id)
            .string("loan_number", &self.loan_number)
            .timestamp("created_date_start", self.created_date_start.as_ref())
            .timestamp("created_date_end", self.created_date_end.as_ref())
            .timestamp("last_updated_date_start", self.last_updated_date_start.as_ref())
            .timestamp("last_updated_date_end", self.last_updated_date_end.as_ref())
            .string("transaction_status", &self.transaction_status)
            .string("document_url_version", &self.document_url_version);
    }
}

/// Filters for [`list_documents`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDocumentsParams {
    pub limit: u32,
    pub offset: u32,
    pub transaction_id: String,
    pub document_type: String,
    pub status: String,
}

impl QueryParams for ListDocumentsParams {
    fn write_query(&self, query: &mut QueryBuilder) {
        query
            .int("limit", self.limit)
            .int("offset", self.offset)
            .string("transaction_id", &self.transaction_id)
            .string("document_type", &self.document_type)
            .string("status", &self.status);
    }
}

/// Paging for [`list_webhooks`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListWebhooksParams {
    pub limit: u32,
    pub offset: u32,
}

impl QueryParams for ListWebhooksParams {
    fn write_query(&self, query: &mut QueryBuilder) {
        query.int("limit", self.limit).int("offset", self.offset);
    }
}

/// A US street address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Address {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub line1: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub line2: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub city: String,
    /// Two-letter state abbreviation.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub postal_code: String,
}

#[derive(Serialize)]
struct VerifyAddressBody<'a> {
    street_address: &'a Address,
}

/// A local file to attach to a mortgage transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_path: PathBuf,
    /// Overrides the base name of `file_path`.
    pub file_name: Option<String>,
    pub external_id: String,
    pub document_type: String,
    pub tags: Vec<String>,
}

impl DocumentUpload {
    /// Lower into multipart fields: `file`, then `external_id`, `document_type`
    /// and `tags` (a JSON array) when they are non-empty.
    pub fn to_multipart(&self) -> Result<MultipartUpload> {
        let mut fields = Vec::new();
        if !self.external_id.is_empty() {
            fields.push(("external_id".to_string(), self.external_id.clone()));
        }
        if !self.document_type.is_empty() {
            fields.push(("document_type".to_string(), self.document_type.clone()));
        }
        if !self.tags.is_empty() {
            let tags = serde_json::to_string(&self.tags).map_err(Error::Serialize)?;
            fields.push(("tags".to_string(), tags));
        }
        Ok(MultipartUpload {
            file_path: self.file_path.clone(),
            file_name: self.file_name.clone(),
            fields,
        })
    }
}

fn transaction(id: &str) -> String {
    format!("{}/{}", TRANSACTIONS_ENDPOINT, id)
}

/// List mortgage transactions.
pub async fn list_transactions(client: &ProofClient, params: &ListTransactionsParams) -> Result<Bytes> {
    client.get(&with_query(TRANSACTIONS_ENDPOINT, params)).await
}

/// Fetch one mortgage transaction.
pub async fn get_transaction(client: &ProofClient, id: &str) -> Result<Bytes> {
    client.get(&transaction(id)).await
}

/// Create a mortgage transaction.
pub async fn create_transaction(client: &ProofClient, body: &Value) -> Result<Bytes> {
    client.post(TRANSACTIONS_ENDPOINT, Some(body)).await
}

/// Place the title/closing order for a transaction.
pub async fn place_order(client: &ProofClient, id: &str) -> Result<Bytes> {
    client
        .post::<Value>(&format!("{}/place_order", transaction(id)), None)
        .await
}

/// Recall a mortgage transaction.
pub async fn recall_transaction(client: &ProofClient, id: &str) -> Result<Bytes> {
    client
        .post::<Value>(&format!("{}/recall", transaction(id)), None)
        .await
}

/// List mortgage documents.
pub async fn list_documents(client: &ProofClient, params: &ListDocumentsParams) -> Result<Bytes> {
    client.get(&with_query(DOCUMENTS_ENDPOINT, params)).await
}

/// Fetch one mortgage document.
pub async fn get_document(client: &ProofClient, document_id: &str) -> Result<Bytes> {
    client
        .get(&format!("{}/{}", DOCUMENTS_ENDPOINT, document_id))
        .await
}

/// Remove a document from a transaction.
pub async fn delete_document(
    client: &ProofClient,
    transaction_id: &str,
    document_id: &str,
) -> Result<Bytes> {
    client
        .delete(&format!("{}/documents/{}", transaction(transaction_id), document_id))
        .await
}

/// Upload a local file to a transaction as `multipart/form-data`.
pub async fn upload_document(
    client: &ProofClient,
    transaction_id: &str,
    upload: &DocumentUpload,
) -> Result<Bytes> {
    let path = format!("{}/documents", transaction(transaction_id));
    client.upload(&path, &upload.to_multipart()?).await
}

/// Attach a document hosted elsewhere. `body` carries `url` and metadata.
pub async fn add_external_document(
    client: &ProofClient,
    transaction_id: &str,
    body: &Value,
) -> Result<Bytes> {
    let path = format!("{}/documents/external", transaction(transaction_id));
    client.post(&path, Some(body)).await
}

/// Save a document URL to `output`.
pub async fn download_document(client: &ProofClient, url: &str, output: &Path) -> Result<u64> {
    client.download_to_file(url, output).await
}
/// Check an address and look up its recording jurisdiction.
pub async fn verify_address(client: &ProofClient, address: &Address) -> Result<Bytes> {
    let path = format!("{}/verify_address", TRANSACTIONS_ENDPOINT);
    let body = VerifyAddressBody {
        street_address: address,
    };
    client.post(&path, Some(&body)).await
}

/// List real estate webhooks.
pub async fn list_webhooks(client: &ProofClient, params: &ListWebhooksParams) -> Result<Bytes> {
    client.get(&with_query(WEBHOOKS_ENDPOINT, params)).await
}

/// Create a real estate webhook.
pub async fn create_webhook(client: &ProofClient, params: &WebhookParams) -> Result<Bytes> {
    client.post(WEBHOOKS_ENDPOINT, Some(params)).await
}
