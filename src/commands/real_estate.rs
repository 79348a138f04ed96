//! `proof real-estate ...`

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

use proof_client::api::real_estate::{
    self, Address, DocumentUpload, ListDocumentsParams, ListTransactionsParams, ListWebhooksParams,
};
use proof_client::api::webhooks::WebhookParams;
use proof_client::ProofClient;

use super::business::parse_date;
use super::parse_json;
use crate::output::Output;

#[derive(Debug, Subcommand)]
pub enum RealEstateResource {
    /// Mortgage transactions.
    #[command(visible_alias = "tx")]
    Transactions {
        #[command(subcommand)]
        action: TransactionAction,
    },
    /// Mortgage documents.
    Documents {
        #[command(subcommand)]
        action: DocumentAction,
    },
    /// Real estate webhooks.
    #[command(visible_alias = "wh")]
    Webhooks {
        #[command(subcommand)]
        action: WebhookAction,
    },
    /// Verify a property address and look up its jurisdiction.
    VerifyAddress(AddressArgs),
}

#[derive(Debug, Subcommand)]
pub enum TransactionAction {
    /// List mortgage transactions.
    #[command(visible_alias = "ls")]
    List(ListTransactionsArgs),
    /// Get a mortgage transaction.
    Get { transaction_id: String },
    /// Create a mortgage transaction from a JSON body.
    Create {
        #[arg(long, short = 'd')]
        data: String,
    },
    /// Place the order for a draft transaction.
    PlaceOrder { transaction_id: String },
    /// Recall a placed transaction.
    Recall { transaction_id: String },
}

#[derive(Debug, Args)]
pub struct ListTransactionsArgs {
    #[arg(long, default_value_t = 0)]
    pub limit: u32,
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
    #[arg(long)]
    pub organization_id: Option<String>,
    #[arg(long)]
    pub loan_number: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    /// Created on or after (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub created_start: Option<DateTime<Utc>>,
    /// Created before (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub created_end: Option<DateTime<Utc>>,
}

#[derive(Debug, Subcommand)]
pub enum DocumentAction {
    /// List mortgage documents.
    #[command(visible_alias = "ls")]
    List {
        #[arg(long, default_value_t = 0)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long)]
        transaction_id: Option<String>,
        #[arg(long)]
        document_type: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Get a mortgage document.
    Get { document_id: String },
    /// Upload a local file to a transaction (multipart, API key only).
    Upload(UploadArgs),
    /// Attach a document hosted elsewhere from a JSON body.
    AddExternal {
        transaction_id: String,
        #[arg(long, short = 'd')]
        data: String,
    },
    /// Remove a document from a transaction.
    Delete {
        transaction_id: String,
        document_id: String,
    },
    /// Download a document URL to a local file (API key only).
    Download { url: String, output: PathBuf },
}

#[derive(Debug, Subcommand)]
pub enum WebhookAction {
    /// List webhooks.
    #[command(visible_alias = "ls")]
    List {
        #[arg(long, default_value_t = 0)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Create a webhook.
    Create {
        /// Receives a POST for every subscribed event.
        url: String,
        /// Header passed through on every delivery, as `Name:Value`.
        #[arg(long)]
        header: Option<String>,
        /// Event to subscribe to. Repeat for several.
        #[arg(long = "subscription", default_value = "*")]
        subscriptions: Vec<String>,
    },
}

#[derive(Debug, Args)]
pub struct AddressArgs {
    #[arg(long)]
    pub line1: String,
    #[arg(long)]
    pub line2: Option<String>,
    #[arg(long)]
    pub city: String,
    /// Two-letter state abbreviation.
    #[arg(long)]
    pub state: String,
    #[arg(long)]
    pub postal_code: Option<String>,
}

impl From<AddressArgs> for Address {
    fn from(args: AddressArgs) -> Self {
        Address {
            line1: args.line1,
            line2: args.line2.unwrap_or_default(),
            city: args.city,
            state: args.state,
            postal_code: args.postal_code.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Args)]
pub struct UploadArgs {
    pub transaction_id: String,
    pub file: PathBuf,
    /// Name reported for the file. Defaults to its base name.
    #[arg(long)]
    pub file_name: Option<String>,
    #[arg(long)]
    pub external_id: Option<String>,
    #[arg(long)]
    pub document_type: Option<String>,
    /// Tag to attach. Repeat for several.
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

impl From<UploadArgs> for DocumentUpload {
    fn from(args: UploadArgs) -> Self {
        DocumentUpload {
            file_path: args.file,
            file_name: args.file_name,
            external_id: args.external_id.unwrap_or_default(),
            document_type: args.document_type.unwrap_or_default(),
            tags: args.tags,
        }
    }
}

pub async fn handle(resource: RealEstateResource, client: &ProofClient) -> anyhow::Result<Output> {
    match resource {
        RealEstateResource::Transactions { action } => {
            let body = match action {
                TransactionAction::List(args) => {
                    let params = ListTransactionsParams {
                        limit: args.limit,
                        offset: args.offset,
                        organization_id: args.organization_id.unwrap_or_default(),
                        loan_number: args.loan_number.unwrap_or_default(),
                        created_date_start: args.created_start,
                        created_date_end: args.created_end,
                        transaction_status: args.status.unwrap_or_default(),
                        ..Default::default()
                    };
                    real_estate::list_transactions(client, &params).await?
                }
                TransactionAction::Get { transaction_id } => {
                    real_estate::get_transaction(client, &transaction_id).await?
                }
                TransactionAction::Create { data } => {
                    real_estate::create_transaction(client, &parse_json(&data)?).await?
                }
                TransactionAction::PlaceOrder { transaction_id } => {
                    real_estate::place_order(client, &transaction_id).await?
                }
                TransactionAction::Recall { transaction_id } => {
                    real_estate::recall_transaction(client, &transaction_id).await?
                }
            };
            Ok(Output::body(body))
        }
        RealEstateResource::Documents { action } => document(action, client).await,
        RealEstateResource::Webhooks { action } => {
            let body = match action {
                WebhookAction::List { limit, offset } => {
                    real_estate::list_webhooks(client, &ListWebhooksParams { limit, offset })
                        .await?
                }
                WebhookAction::Create {
                    url,
                    header,
                    subscriptions,
                } => {
                    let params = WebhookParams {
                        url,
                        header,
                        subscriptions,
                    };
                    real_estate::create_webhook(client, &params).await?
                }
            };
            Ok(Output::body(body))
        }
        RealEstateResource::VerifyAddress(args) => {
            let body = real_estate::verify_address(client, &args.into()).await?;
            Ok(Output::body(body))
        }
    }
}

async fn document(action: DocumentAction, client: &ProofClient) -> anyhow::Result<Output> {
    let body = match action {
        DocumentAction::List {
            limit,
            offset,
            transaction_id,
            document_type,
            status,
        } => {
            let params = ListDocumentsParams {
                limit,
                offset,
                transaction_id: transaction_id.unwrap_or_default(),
                document_type: document_type.unwrap_or_default(),
                status: status.unwrap_or_default(),
            };
            real_estate::list_documents(client, &params).await?
        }
        DocumentAction::Get { document_id } => {
            real_estate::get_document(client, &document_id).await?
        }
        DocumentAction::Upload(args) => {
            let transaction_id = args.transaction_id.clone();
            let upload = DocumentUpload::from(args);
            real_estate::upload_document(client, &transaction_id, &upload).await?
        }
        DocumentAction::AddExternal {
            transaction_id,
            data,
        } => real_estate::add_external_document(client, &transaction_id, &parse_json(&data)?).await?,
        DocumentAction::Delete {
            transaction_id,
            document_id,
        } => real_estate::delete_document(client, &transaction_id, &document_id).await?,
        DocumentAction::Download { url, output } => {
            let written = real_estate::download_document(client, &url, &output).await?;
            return Ok(Output::line(format!(
                "Downloaded {written} bytes to {}",
                output.display()
            )));
        }
    };
    Ok(Output::body(body))
}
