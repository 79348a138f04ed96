//! `proof business ...`

use std::path::PathBuf;

use anyhow::bail;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};
use serde_json::json;

use proof_client::api::transactions::{self, DOCUMENT_URL_VERSION, ListTransactionsParams};
use proof_client::api::webhooks::{self, WebhookEventsParams, WebhookParams};
use proof_client::api::integrations::{self, IntegrationParams};
use proof_client::api::referrals::{self, ReferralLinkParams, ReferralParams};
use proof_client::api::templates::{self, ListTemplatesParams};
use proof_client::api::{documents, notaries};
use proof_client::ProofClient;

use super::{parse_json, Body};
use crate::output::Output;

#[derive(Debug, Subcommand)]
pub enum BusinessResource {
    /// Business transactions.
    #[command(visible_alias = "tx")]
    Transactions {
        #[command(subcommand)]
        action: TransactionAction,
    },
    /// Documents attached to business transactions.
    Documents {
        #[command(subcommand)]
        action: DocumentAction,
    },
    /// Webhooks (v2).
    #[command(visible_alias = "wh")]
    Webhooks {
        #[command(subcommand)]
        action: WebhookAction,
    },
    /// Notaries of your organization.
    Notaries {
        #[command(subcommand)]
        action: NotaryAction,
    },
    /// Document templates.
    Templates {
        #[command(subcommand)]
        action: TemplateAction,
    },
    /// Referral campaigns.
    Referrals {
        #[command(subcommand)]
        action: ReferralAction,
    },
    /// Third-party integrations.
    Integrations {
        #[command(subcommand)]
        action: IntegrationAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum TransactionAction {
    /// List transactions.
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Get a transaction.
    Get { transaction_id: String },
    /// Create a transaction with one signer and one document.
    Create(CreateTransactionArgs),
    /// Replace a draft transaction with a JSON body.
    Update {
        transaction_id: String,
        #[arg(long, short = 'd')]
        data: String,
    },
    /// Partially update a draft transaction with a JSON body.
    Patch {
        transaction_id: String,
        #[arg(long, short = 'd')]
        data: String,
    },
    /// Delete a transaction.
    Delete { transaction_id: String },
    /// Mark a draft transaction ready for notarization.
    Activate { transaction_id: String },
    /// Recall a sent transaction.
    Recall {
        transaction_id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Resend the signer email.
    ResendEmail {
        transaction_id: String,
        /// Message to the signer.
        #[arg(long)]
        message: Option<String>,
    },
    /// Resend the signer SMS.
    ResendSms {
        transaction_id: String,
        #[arg(long)]
        phone_number: Option<String>,
    },
    /// Notaries eligible to take the transaction.
    EligibleNotaries { transaction_id: String },
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long, default_value_t = 10)]
    pub limit: u32,
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
    /// Filter by transaction status.
    #[arg(long)]
    pub status: Option<String>,
    /// Created on or after (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub created_start: Option<DateTime<Utc>>,
    /// Created before (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub created_end: Option<DateTime<Utc>>,
    /// Last updated on or after (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub last_updated_start: Option<DateTime<Utc>>,
    /// Last updated before (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub last_updated_end: Option<DateTime<Utc>>,
}

impl From<ListArgs> for ListTransactionsParams {
    fn from(args: ListArgs) -> Self {
        ListTransactionsParams {
            limit: args.limit,
            offset: args.offset,
            created_date_start: args.created_start,
            created_date_end: args.created_end,
            last_updated_date_start: args.last_updated_start,
            last_updated_date_end: args.last_updated_end,
            transaction_status: args.status.unwrap_or_default(),
            document_url_version: DOCUMENT_URL_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Args)]
pub struct CreateTransactionArgs {
    /// Full request body as JSON. Other flags are ignored when set.
    #[arg(long, short = 'd')]
    pub data: Option<String>,
    /// Signer email address.
    #[arg(long, required_unless_present = "data")]
    pub email: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    /// Document to upload, sent base64-encoded.
    #[arg(long, required_unless_present = "data")]
    pub document: Option<PathBuf>,
    /// Transaction name.
    #[arg(long)]
    pub name: Option<String>,
    /// Transaction type (e.g. "Account Opening").
    #[arg(long = "type")]
    pub transaction_type: Option<String>,
    /// Create as draft.
    #[arg(long)]
    pub draft: bool,
    #[arg(long)]
    pub external_id: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum DocumentAction {
    /// Add a local file to a transaction.
    Add(AddDocumentArgs),
    /// Get a document of a transaction.
    Get {
        transaction_id: String,
        document_id: String,
        /// `base64`, or `uri` for a hosted URL (completed transactions only).
        #[arg(long)]
        encoding: Option<String>,
    },
    /// Replace a document's settings with a JSON body.
    Update {
        document_id: String,
        #[arg(long, short = 'd')]
        data: String,
    },
    /// Partially update a document's settings with a JSON body.
    Patch {
        document_id: String,
        #[arg(long, short = 'd')]
        data: String,
    },
    /// Delete a document.
    Delete { document_id: String },
}

#[derive(Debug, Args)]
pub struct AddDocumentArgs {
    pub transaction_id: String,
    pub file: PathBuf,
    /// Plain language name for the document.
    #[arg(long)]
    pub filename: Option<String>,
    /// Completion requirement (notarization, esign, identity_confirmation, readonly, non_essential).
    #[arg(long)]
    pub requirement: Option<String>,
    #[arg(long)]
    pub notarization_required: bool,
    #[arg(long)]
    pub witness_required: bool,
    #[arg(long)]
    pub esign_required: bool,
    #[arg(long)]
    pub vaulted: bool,
    /// Position in the document bundle.
    #[arg(long)]
    pub bundle_position: Option<u32>,
    /// External tracking identifier.
    #[arg(long)]
    pub tracking_id: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum WebhookAction {
    /// List webhooks.
    List,
    /// Get a webhook.
    Get { webhook_id: String },
    /// Create a webhook.
    Create(WebhookArgs),
    /// Replace a webhook.
    Update {
        webhook_id: String,
        #[command(flatten)]
        webhook: WebhookArgs,
    },
    /// Delete a webhook.
    Delete { webhook_id: String },
    /// Events delivered to a webhook.
    Events {
        webhook_id: String,
        #[arg(long, default_value_t = 0)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Event names available for subscription.
    Subscriptions,
    /// Get the organization's legacy v1 webhook.
    Legacy,
}

#[derive(Debug, Args)]
pub struct WebhookArgs {
    /// Receives a POST for every subscribed event.
    #[arg(long)]
    pub url: String,
    /// Event to subscribe to. Repeat for several.
    #[arg(long = "subscription", required = true)]
    pub subscriptions: Vec<String>,
    /// Header passed through on every delivery, as `Name:Value`.
    #[arg(long)]
    pub header: Option<String>,
}

impl WebhookArgs {
    fn into_params(self) -> anyhow::Result<WebhookParams> {
        if let Some(unknown) = self
            .subscriptions
            .iter()
            .find(|s| !webhooks::is_known_subscription(s))
        {
            bail!("unknown webhook subscription '{unknown}'");
        }
        Ok(WebhookParams {
            url: self.url,
            header: self.header,
            subscriptions: self.subscriptions,
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum NotaryAction {
    /// List notaries.
    List {
        /// Child organization to list.
        #[arg(long)]
        organization_id: Option<String>,
        /// Two-letter commission state.
        #[arg(long)]
        state: Option<String>,
    },
    /// Get a notary.
    Get { notary_id: String },
    /// Create a notary account.
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        middle_name: Option<String>,
        #[arg(long)]
        last_name: String,
        /// Two-letter commission state.
        #[arg(long)]
        state: String,
    },
    /// Update a notary account with a JSON body.
    Update {
        notary_id: String,
        #[arg(long, short = 'd')]
        data: String,
    },
    /// Delete a notary account.
    Delete { notary_id: String },
}

#[derive(Debug, Subcommand)]
pub enum TemplateAction {
    /// List document templates.
    #[command(visible_alias = "ls")]
    List {
        #[arg(long, default_value_t = 0)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReferralAction {
    /// Create a referral campaign.
    Create {
        #[arg(long)]
        name: String,
        /// Your organization pays for referred transactions.
        #[arg(long)]
        cover_payment: bool,
        /// Child organization to create the campaign for.
        #[arg(long)]
        organization_id: Option<String>,
        #[arg(long)]
        redirect_url: Option<String>,
        /// Show your organization's branding.
        #[arg(long)]
        use_branding: bool,
    },
    /// Generate a single-use link for a campaign.
    GenerateLink {
        campaign_id: String,
        /// ISO 8601 expiry. Defaults to three months.
        #[arg(long)]
        expires_at: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum IntegrationAction {
    /// Create an integration.
    Create {
        /// `ADOBE` or `DOCUTECH`.
        #[arg(long)]
        name: String,
        #[arg(long = "org-id")]
        organization_id: Option<String>,
        #[arg(long)]
        account_id: Option<String>,
        #[arg(long)]
        environment: Option<String>,
    },
}

pub async fn handle(resource: BusinessResource, client: &ProofClient) -> anyhow::Result<Output> {
    let body = match resource {
        BusinessResource::Transactions { action } => transaction(action, client).await?,
        BusinessResource::Documents { action } => document(action, client).await?,
        BusinessResource::Webhooks { action } => webhook(action, client).await?,
        BusinessResource::Notaries { action } => notary(action, client).await?,
        BusinessResource::Templates {
            action: TemplateAction::List { limit, offset },
        } => templates::list(client, &ListTemplatesParams { limit, offset })
            .await?
            .to_vec(),
        BusinessResource::Referrals { action } => referral(action, client).await?,
        BusinessResource::Integrations {
            action:
                IntegrationAction::Create {
                    name,
                    organization_id,
                    account_id,
                    environment,
                },
        } => {
            let params = IntegrationParams::new(
                &name,
                organization_id.as_deref().unwrap_or_default(),
                account_id.as_deref().unwrap_or_default(),
                environment.as_deref().unwrap_or_default(),
            );
            integrations::create(client, &params).await?.to_vec()
        }
    };
    Ok(Output::body(body))
}

async fn transaction(action: TransactionAction, client: &ProofClient) -> anyhow::Result<Vec<u8>> {
    let body = match action {
        TransactionAction::List(args) => transactions::list(client, &args.into()).await?,
        TransactionAction::Get { transaction_id } => {
            transactions::get(client, &transaction_id).await?
        }
        TransactionAction::Create(args) => {
            let body = create_transaction_body(args).await?;
            transactions::create(client, &body).await?
        }
        TransactionAction::Update {
            transaction_id,
            data,
        } => transactions::update(client, &transaction_id, &parse_json(&data)?).await?,
        TransactionAction::Patch {
            transaction_id,
            data,
        } => transactions::patch(client, &transaction_id, &parse_json(&data)?).await?,
        TransactionAction::Delete { transaction_id } => {
            transactions::delete(client, &transaction_id).await?
        }
        TransactionAction::Activate { transaction_id } => {
            transactions::activate(client, &transaction_id).await?
        }
        TransactionAction::Recall {
            transaction_id,
            reason,
        } => transactions::recall(client, &transaction_id, reason.as_deref()).await?,
        TransactionAction::ResendEmail {
            transaction_id,
            message,
        } => transactions::resend_email(client, &transaction_id, message.as_deref()).await?,
        TransactionAction::ResendSms {
            transaction_id,
            phone_number,
        } => transactions::resend_sms(client, &transaction_id, phone_number.as_deref()).await?,
        TransactionAction::EligibleNotaries { transaction_id } => {
            transactions::eligible_notaries(client, &transaction_id).await?
        }
    };
    Ok(body.to_vec())
}

async fn create_transaction_body(args: CreateTransactionArgs) -> anyhow::Result<serde_json::Value> {
    if let Some(data) = args.data.as_deref() {
        return parse_json(data);
    }
    let (Some(email), Some(document)) = (args.email, args.document) else {
        bail!("email and document are required");
    };

    let resource = transactions::document_resource(&document).await?;
    let signer = Body::default()
        .string("email", Some(email))
        .string("first_name", args.first_name)
        .string("last_name", args.last_name)
        .build();

    Ok(Body::default()
        .string("transaction_name", args.name)
        .string("transaction_type", args.transaction_type)
        .string("external_id", args.external_id)
        .flag("draft", args.draft)
        .value("documents", json!([resource]))
        .value("signers", json!([signer]))
        .build())
}

async fn document(action: DocumentAction, client: &ProofClient) -> anyhow::Result<Vec<u8>> {
    let body = match action {
        DocumentAction::Add(args) => {
            let resource = transactions::document_resource(&args.file).await?;
            let mut body = Body::default()
                .string("resource", Some(resource))
                .string("filename", args.filename)
                .string("requirement", args.requirement)
                .flag("notarization_required", args.notarization_required)
                .flag("witness_required", args.witness_required)
                .flag("esign_required", args.esign_required)
                .flag("vaulted", args.vaulted)
                .string("tracking_id", args.tracking_id);
            if let Some(position) = args.bundle_position.filter(|p| *p > 0) {
                body = body.value("bundle_position", json!(position));
            }
            documents::add(client, &args.transaction_id, &body.build()).await?
        }
        DocumentAction::Get {
            transaction_id,
            document_id,
            encoding,
        } => documents::get(client, &transaction_id, &document_id, encoding.as_deref()).await?,
        DocumentAction::Update { document_id, data } => {
            documents::update(client, &document_id, &parse_json(&data)?).await?
        }
        DocumentAction::Patch { document_id, data } => {
            documents::patch(client, &document_id, &parse_json(&data)?).await?
        }
        DocumentAction::Delete { document_id } => documents::delete(client, &document_id).await?,
    };
    Ok(body.to_vec())
}

async fn webhook(action: WebhookAction, client: &ProofClient) -> anyhow::Result<Vec<u8>> {
    let body = match action {
        WebhookAction::List => webhooks::list(client).await?,
        WebhookAction::Get { webhook_id } => webhooks::get(client, &webhook_id).await?,
        WebhookAction::Create(args) => webhooks::create(client, &args.into_params()?).await?,
        WebhookAction::Update {
            webhook_id,
            webhook,
        } => webhooks::update(client, &webhook_id, &webhook.into_params()?).await?,
        WebhookAction::Delete { webhook_id } => webhooks::delete(client, &webhook_id).await?,
        WebhookAction::Events {
            webhook_id,
            limit,
            offset,
        } => {
            let params = WebhookEventsParams { limit, offset };
            webhooks::events(client, &webhook_id, &params).await?
        }
        WebhookAction::Subscriptions => webhooks::subscriptions(client).await?,
        WebhookAction::Legacy => webhooks::get_legacy(client).await?,
    };
    Ok(body.to_vec())
}

async fn notary(action: NotaryAction, client: &ProofClient) -> anyhow::Result<Vec<u8>> {
    let body = match action {
        NotaryAction::List {
            organization_id,
            state,
        } => {
            let params = notaries::ListNotariesParams {
                organization_id: organization_id.unwrap_or_default(),
                us_state_abbr: state.unwrap_or_default(),
            };
            notaries::list(client, &params).await?
        }
        NotaryAction::Get { notary_id } => notaries::get(client, &notary_id).await?,
        NotaryAction::Create {
            email,
            first_name,
            middle_name,
            last_name,
            state,
        } => {
            let body = Body::default()
                .string("email", Some(email))
                .string("us_state_abbr", Some(state))
                .string("first_name", Some(first_name))
                .string("middle_name", middle_name)
                .string("last_name", Some(last_name))
                .build();
            notaries::create(client, &body).await?
        }
        NotaryAction::Update { notary_id, data } => {
            notaries::update(client, &notary_id, &parse_json(&data)?).await?
        }
        NotaryAction::Delete { notary_id } => notaries::delete(client, &notary_id).await?,
    };
    Ok(body.to_vec())
}

async fn referral(action: ReferralAction, client: &ProofClient) -> anyhow::Result<Vec<u8>> {
    let body = match action {
        ReferralAction::Create {
            name,
            cover_payment,
            organization_id,
            redirect_url,
            use_branding,
        } => {
            let params = ReferralParams {
                name,
                cover_payment,
                organization_id: organization_id.unwrap_or_default(),
                redirect_url: redirect_url.unwrap_or_default(),
                use_branding,
            };
            referrals::create(client, &params).await?
        }
        ReferralAction::GenerateLink {
            campaign_id,
            expires_at,
        } => {
            let params = ReferralLinkParams { expires_at };
            referrals::generate_link(client, &campaign_id, &params).await?
        }
    };
    Ok(body.to_vec())
}

/// `YYYY-MM-DD` as midnight UTC.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn business(args: &[&str]) -> BusinessResource {
        let mut argv = vec!["proof", "business"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Business { resource } => resource,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-03-09").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-09T00:00:00+00:00");
        assert!(parse_date("03/09/2024").is_err());
    }

    #[test]
    fn test_list_args_into_params() {
        let BusinessResource::Transactions {
            action: TransactionAction::List(args),
        } = business(&["transactions", "list", "--status", "completed", "--created-start", "2024-01-01"])
        else {
            panic!("expected transactions list");
        };
        let params: ListTransactionsParams = args.into();
        assert_eq!(params.limit, 10);
        assert_eq!(params.transaction_status, "completed");
        assert_eq!(params.document_url_version, "v2");
        assert!(params.created_date_start.is_some());
        assert!(params.created_date_end.is_none());
    }

    #[test]
    fn test_create_requires_email_without_data() {
        let argv = ["proof", "business", "transactions", "create", "--document", "a.pdf"];
        assert!(Cli::try_parse_from(argv).is_err());

        let argv = ["proof", "business", "transactions", "create", "--data", "{}"];
        assert!(Cli::try_parse_from(argv).is_ok());
    }

    #[tokio::test]
    async fn test_create_transaction_body() {
        let dir = tempfile::tempdir().unwrap();
        let document = dir.path().join("doc.pdf");
        std::fs::write(&document, b"%PDF").unwrap();

        let args = CreateTransactionArgs {
            data: None,
            email: Some("signer@example.com".into()),
            first_name: Some("Ada".into()),
            last_name: None,
            document: Some(document),
            name: Some("Loan".into()),
            transaction_type: None,
            draft: true,
            external_id: None,
        };
        let body = create_transaction_body(args).await.unwrap();
        assert_eq!(
            body,
            json!({
                "transaction_name": "Loan",
                "draft": true,
                "documents": ["JVBERg=="],
                "signers": [{"email": "signer@example.com", "first_name": "Ada"}]
            })
        );
    }

    #[test]
    fn test_referral_create_flags() {
        let BusinessResource::Referrals {
            action:
                ReferralAction::Create {
                    name,
                    cover_payment,
                    use_branding,
                    redirect_url,
                    ..
                },
        } = business(&["referrals", "create", "--name", "Spring", "--cover-payment"])
        else {
            panic!("expected referrals create");
        };
        assert_eq!(name, "Spring");
        assert!(cover_payment);
        assert!(!use_branding);
        assert!(redirect_url.is_none());

        assert!(Cli::try_parse_from(["proof", "business", "referrals", "create"]).is_err());
    }

    #[test]
    fn test_integration_org_id_flag() {
        let BusinessResource::Integrations {
            action: IntegrationAction::Create {
                organization_id, ..
            },
        } = business(&["integrations", "create", "--name", "ADOBE", "--org-id", "org_1"])
        else {
            panic!("expected integrations create");
        };
        assert_eq!(organization_id.as_deref(), Some("org_1"));
    }

    #[test]
    fn test_webhook_subscriptions_validated() {
        let args = WebhookArgs {
            url: "https://example.com".into(),
            subscriptions: vec!["transaction.completed".into(), "bogus".into()],
            header: None,
        };
        let err = args.into_params().unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }
}
