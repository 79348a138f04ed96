//! # proof-client
//!
//! Rust client library for the Proof API (business notarization, real estate
//! closings, SCIM provisioning).
//!
//! Authenticates with either an API key (`ApiKey` header) or OAuth 2.0 client
//! credentials (`Authorization: Bearer`). OAuth tokens are fetched lazily,
//! persisted next to the rest of the config, and reused until five minutes
//! before they expire.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use proof_client::api::transactions::{self, ListTransactionsParams};
//! use proof_client::{ProofClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Reads ~/.proof-cli/config.json and PROOF_API_KEY
//!     let client = ProofClient::builder().build().await?;
//!
//!     let params = ListTransactionsParams {
//!         limit: 10,
//!         ..Default::default()
//!     };
//!     let body = transactions::list(&client, &params).await?;
//!     println!("{}", String::from_utf8_lossy(&body));
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod query;
pub mod storage;
pub mod transport;

// Re-exports for ergonomic usage
pub use client::{ProofClient, ProofClientBuilder};
pub use error::{Error, Result};
pub use models::auth::{CredentialSource, Credentials, OAuthCredentials, OAuthToken, TokenState};
pub use models::config::{Config, OAuthConfig};
pub use query::{QueryBuilder, QueryParams};
pub use storage::{ConfigStore, FileConfigStore, MemoryConfigStore};
pub use reqwest::Method;
pub use transport::{MultipartUpload, RequestOptions};
