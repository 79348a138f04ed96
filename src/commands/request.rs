//! `proof request METHOD PATH`

use proof_client::{ProofClient, RequestOptions};
use tracing::debug;

use super::parse_json;
use crate::cli::RequestArgs;
use crate::output::Output;

pub async fn handle(args: RequestArgs, client: &ProofClient) -> anyhow::Result<Output> {
    let body = args.data.as_deref().map(parse_json).transpose()?;
    let options = if args.scim {
        RequestOptions::scim()
    } else {
        RequestOptions::default()
    };
    let method = args.method.as_method();
    debug!(method = method.as_str(), path = %args.path, "Raw request");

    let response = client
        .request(method, &args.path, body.as_ref(), &options)
        .await?;
    Ok(Output::body(response))
}
