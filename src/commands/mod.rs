//! Command handlers.
//!
//! Each handler receives what it needs by reference and returns an
//! [`Output`]; printing happens once in `main`.

pub mod business;
pub mod config;
pub mod real_estate;
pub mod request;
pub mod scim;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use serde_json::{Map, Value};

use proof_client::{ConfigStore, FileConfigStore, ProofClient};

use crate::cli::Command;
use crate::output::Output;

/// Where configuration lives and how API clients are built.
pub struct Context {
    store: Arc<dyn ConfigStore>,
    api_key_override: Option<Option<String>>,
}

impl Context {
    /// Use the file at `path`, or `~/.proof-cli/config.json` when `None`.
    pub fn new(config_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let store = match config_path {
            Some(path) => FileConfigStore::new(path),
            None => FileConfigStore::default_path()?,
        };
        Ok(Self::with_store(Arc::new(store)))
    }

    pub fn with_store(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            store,
            api_key_override: None,
        }
    }

    /// Use this key in place of `PROOF_API_KEY`.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        self.api_key_override = Some(key);
        self
    }

    pub fn store(&self) -> &Arc<dyn ConfigStore> {
        &self.store
    }

    /// Build the API client for this invocation.
    pub async fn client(&self) -> anyhow::Result<ProofClient> {
        let mut builder = ProofClient::builder().store(Arc::clone(&self.store));
        if let Some(key) = &self.api_key_override {
            builder = builder.api_key_override(key.clone());
        }
        Ok(builder.build().await?)
    }
}

/// Run one command to completion.
pub async fn run(command: Command, ctx: &Context) -> anyhow::Result<Output> {
    match command {
        Command::Version => Ok(Output::line(format!(
            "proof version {}",
            env!("CARGO_PKG_VERSION")
        ))),
        Command::Config { action } => config::handle(action, ctx).await,
        Command::Request(args) => {
            let client = ctx.client().await?;
            request::handle(args, &client).await
        }
        Command::Business { resource } => {
            let client = ctx.client().await?;
            business::handle(resource, &client).await
        }
        Command::RealEstate { resource } => {
            let client = ctx.client().await?;
            real_estate::handle(resource, &client).await
        }
        Command::Scim { resource } => {
            let client = ctx.client().await?;
            scim::handle(resource, &client).await
        }
    }
}

/// Parse a `--data` argument.
pub(crate) fn parse_json(data: &str) -> anyhow::Result<Value> {
    serde_json::from_str(data).context("--data is not valid JSON")
}

/// JSON object builder that drops empty strings and `false`.
#[derive(Debug, Default)]
pub(crate) struct Body(Map<String, Value>);

impl Body {
    pub(crate) fn string(mut self, key: &str, value: Option<String>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.0.insert(key.to_string(), Value::String(value));
        }
        self
    }

    pub(crate) fn flag(mut self, key: &str, value: bool) -> Self {
        if value {
            self.0.insert(key.to_string(), Value::Bool(true));
        }
        self
    }

    pub(crate) fn value(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub(crate) fn build(self) -> Value {
        Value::Object(self.0)
    }
}
