//! Command-line definition for `proof`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::business::BusinessResource;
use crate::commands::config::ConfigAction;
use crate::commands::real_estate::RealEstateResource;
use crate::commands::scim::ScimResource;

#[derive(Debug, Parser)]
#[command(
    name = "proof",
    version,
    about = "A CLI for interacting with the Proof API",
    long_about = "A command-line interface for interacting with the Proof API.\n\
                  Manage transactions, documents, notaries, webhooks and SCIM users."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file to use instead of ~/.proof-cli/config.json.
    #[arg(long, global = true, env = "PROOF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output logs as JSON lines instead of human-readable.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Print response bodies as received instead of pretty-printed.
    #[arg(long, global = true)]
    pub raw: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// View and modify configuration settings.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print the version number.
    Version,
    /// Send an arbitrary request to the API.
    Request(RequestArgs),
    /// Business API operations.
    #[command(visible_alias = "biz")]
    Business {
        #[command(subcommand)]
        resource: BusinessResource,
    },
    /// Real estate (mortgage) API operations.
    #[command(visible_alias = "re")]
    RealEstate {
        #[command(subcommand)]
        resource: RealEstateResource,
    },
    /// SCIM user provisioning.
    Scim {
        #[command(subcommand)]
        resource: ScimResource,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_method(self) -> proof_client::Method {
        match self {
            HttpMethod::Get => proof_client::Method::GET,
            HttpMethod::Post => proof_client::Method::POST,
            HttpMethod::Put => proof_client::Method::PUT,
            HttpMethod::Patch => proof_client::Method::PATCH,
            HttpMethod::Delete => proof_client::Method::DELETE,
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct RequestArgs {
    /// HTTP method.
    #[arg(value_enum, ignore_case = true)]
    pub method: HttpMethod,
    /// Path below the API endpoint, with any query string (e.g. /v1/transactions?limit=5).
    pub path: String,
    /// JSON request body.
    #[arg(long, short = 'd')]
    pub data: Option<String>,
    /// Negotiate application/scim+json instead of application/json.
    #[arg(long)]
    pub scim: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["proof", "config", "get", "--raw", "-v"]).unwrap();
        assert!(cli.raw);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Config {
                action: ConfigAction::Get
            }
        ));
    }

    #[test]
    fn test_request_method_case_insensitive() {
        let cli = Cli::try_parse_from([
            "proof",
            "request",
            "post",
            "/v2/webhooks",
            "--data",
            r#"{"url":"https://example.com"}"#,
        ])
        .unwrap();
        match cli.command {
            Command::Request(args) => {
                assert_eq!(args.method, HttpMethod::Post);
                assert_eq!(args.path, "/v2/webhooks");
                assert!(args.data.is_some());
                assert!(!args.scim);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_method_rejected() {
        assert!(Cli::try_parse_from(["proof", "request", "TRACE", "/"]).is_err());
    }

    #[test]
    fn test_business_alias() {
        let cli = Cli::try_parse_from(["proof", "biz", "transactions", "get", "ot_1"]).unwrap();
        assert!(matches!(cli.command, Command::Business { .. }));
    }
}
