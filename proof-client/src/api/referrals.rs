//! Referral campaigns: `/v1/referrals`.

use bytes::Bytes;
use serde::Serialize;

use crate::client::ProofClient;
use crate::error::Result;

/// Base path.
pub const REFERRALS_ENDPOINT: &str = "/v1/referrals";

/// Body for [`create`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferralParams {
    /// Campaign name.
    pub name: String,
    /// The organization pays for referred transactions.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cover_payment: bool,
    /// Child organization to create the campaign for.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub organization_id: String,
    /// Where customers land after following the referral.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub redirect_url: String,
    /// Referred transactions show the organization's branding.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub use_branding: bool,
}

/// Body for [`generate_link`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferralLinkParams {
    /// ISO 8601 expiry. The server defaults to three months.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// Create a referral campaign.
pub async fn create(client: &ProofClient, params: &ReferralParams) -> Result<Bytes> {
    client.post(REFERRALS_ENDPOINT, Some(params)).await
}

/// Generate a single-use referral link for a campaign.
pub async fn generate_link(
    client: &ProofClient,
    campaign_id: &str,
    params: &ReferralLinkParams,
) -> Result<Bytes> {
    let path = format!("{}/{}/generate_link", REFERRALS_ENDPOINT, campaign_id);
    client.post(&path, Some(params)).await
}
