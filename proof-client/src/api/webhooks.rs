//! Webhooks: `/v2/webhooks`, and the legacy `/v1/webhooks` lookup.

use bytes::Bytes;
use serde::Serialize;

use crate::client::ProofClient;
use crate::error::Result;
use crate::query::{with_query, QueryBuilder, QueryParams};

/// Base path.
pub const WEBHOOKS_ENDPOINT: &str = "/v2/webhooks";

/// Pre-v2 route holding one webhook URL per organization.
pub const LEGACY_WEBHOOK_ENDPOINT: &str = "/v1/webhooks";

/// Event names a webhook can subscribe to.
pub const SUBSCRIPTIONS: &[&str] = &[
    "*",
    "transaction.*",
    "transaction.created",
    "transaction.sent",
    "transaction.updated",
    "transaction.received",
    "transaction.completed",
    "transaction.completed_with_rejections",
    "transaction.partially_completed",
    "transaction.deleted",
    "transaction.recalled",
    "transaction.expired",
    "transaction.released",
    "transaction.reviewed",
    "transaction.sent_to_closing_ops",
    "transaction.sent_to_signer",
    "transaction.sent_to_title_agency",
    "transaction.document.upload",
    "transaction.document.processed",
    "transaction.import.processed",
    "transaction.import.failed",
    "transaction.meeting.created",
    "transaction.meeting.failed",
    "transaction.meeting.requested",
    "transaction.meeting.video.processed",
    "transaction.notary.assigned",
    "transaction.signer.kba_failed",
    "transaction.signer.kba_passed",
    "transaction.signer.high_risk_detected",
    "transaction.signer.medium_risk_detected",
    "transaction.transaction.automated_identity_verification_by_idv_service_failed",
    "transaction.transaction.automated_identity_verification_by_idv_service_passed",
    "transaction.underwriter.not_available",
    "notary.*",
    "notary.created",
    "notary.needs_review",
    "notary.compliant",
    "notary.non_compliant",
    "notary.signer_ready",
];

/// Body for [`create`] and [`update`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebhookParams {
    /// Receives a POST for every subscribed event.
    pub url: String,
    /// Passed through on every delivery, as `Name:Value`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    pub subscriptions: Vec<String>,
}

/// True if `event` is one of [`SUBSCRIPTIONS`].
pub fn is_known_subscription(event: &str) -> bool {
    SUBSCRIPTIONS.contains(&event)
}

/// Paging for [`events`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookEventsParams {
    /// Results per page. Server default 20, max 100.
    pub limit: u32,
    pub offset: u32,
}

impl QueryParams for WebhookEventsParams {
    fn write_query(&self, query: &mut QueryBuilder) {
        query.int("limit", self.limit).int("offset", self.offset);
    }
}

fn item(id: &str) -> String {
    format!("{}/{}", WEBHOOKS_ENDPOINT, id)
}

/// The organization's single v1 webhook URL.
pub async fn get_legacy(client: &ProofClient) -> Result<Bytes> {
    client.get(LEGACY_WEBHOOK_ENDPOINT).await
}

/// List webhooks.
pub async fn list(client: &ProofClient) -> Result<Bytes> {
    client.get(WEBHOOKS_ENDPOINT).await
}

/// Fetch one webhook.
pub async fn get(client: &ProofClient, id: &str) -> Result<Bytes> {
    client.get(&item(id)).await
}

/// Create a webhook.
pub async fn create(client: &ProofClient, params: &WebhookParams) -> Result<Bytes> {
    client.post(WEBHOOKS_ENDPOINT, Some(params)).await
}

/// Replace a webhook.
pub async fn update(client: &ProofClient, id: &str, params: &WebhookParams) -> Result<Bytes> {
    client.put(&item(id), Some(params)).await
}

/// Event names the server currently accepts.
pub async fn subscriptions(client: &ProofClient) -> Result<Bytes> {
    client
        .get(&format!("{}/subscriptions", WEBHOOKS_ENDPOINT))
        .await
}

/// Delete a webhook.
pub async fn delete(client: &ProofClient, id: &str) -> Result<Bytes> {
    client.delete(&item(id)).await
}

/// Events delivered to a webhook.
pub async fn events(client: &ProofClient, id: &str, params: &WebhookEventsParams) -> Result<Bytes> {
    client
        .get(&with_query(&format!("{}/events", item(id)), params))
        .await
}
