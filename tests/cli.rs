//! End-to-end command tests: argv in, rendered stdout out, against a mock API.

use std::sync::Arc;

use clap::Parser;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use proof_cli::cli::Cli;
use proof_cli::commands::{self, Context};
use proof_client::{Config, ConfigStore, MemoryConfigStore};

fn context(uri: &str) -> Context {
    let store = Arc::new(MemoryConfigStore::with_config(Config {
        api_endpoint: uri.to_string(),
        ..Config::default()
    }));
    Context::with_store(store).with_api_key_override(Some("test-key".into()))
}

async fn run(ctx: &Context, argv: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(argv)?;
    let output = commands::run(cli.command, ctx).await?;
    Ok(output.render(cli.raw))
}

// ---------------------------------------------------------------------------
// Business
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_transactions_list_pretty_prints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/transactions"))
        .and(header("apikey", "test-key"))
        .and(query_param("limit", "5"))
        .and(query_param("transaction_status", "completed"))
        .and(query_param("document_url_version", "v2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":[],"count":0}"#))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server.uri());
    let out = run(
        &ctx,
        &["proof", "biz", "tx", "list", "--limit", "5", "--status", "completed"],
    )
    .await
    .unwrap();
    assert_eq!(out, "{\n  \"count\": 0,\n  \"data\": []\n}");
}

#[tokio::test]
async fn test_webhook_create_sends_typed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/webhooks"))
        .and(body_json(json!({
            "url": "https://example.com/hook",
            "subscriptions": ["transaction.completed"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"wh_1"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server.uri());
    let out = run(
        &ctx,
        &[
            "proof",
            "--raw",
            "business",
            "webhooks",
            "create",
            "--url",
            "https://example.com/hook",
            "--subscription",
            "transaction.completed",
        ],
    )
    .await
    .unwrap();
    assert_eq!(out, r#"{"id":"wh_1"}"#);
}

#[tokio::test]
async fn test_api_error_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/notaries/nt_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error":"not found"}"#))
        .mount(&server)
        .await;

    let ctx = context(&server.uri());
    let err = run(&ctx, &["proof", "biz", "notaries", "get", "nt_missing"])
        .await
        .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("404"), "{message}");
    assert!(message.contains("not found"), "{message}");
}

#[tokio::test]
async fn test_templates_list_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/templates"))
        .and(query_param("limit", "20"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":[]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server.uri());
    run(&ctx, &["proof", "biz", "templates", "list", "--limit", "20"])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_referral_campaign_and_link() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/referrals"))
        .and(body_json(json!({
            "name": "Spring",
            "redirect_url": "https://example.com/welcome",
            "use_branding": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"rc_1"}"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/referrals/rc_1/generate_link"))
        .and(body_json(json!({"expires_at": "2026-12-31T00:00:00Z"})))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"url":"https://r.example/x"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server.uri());
    run(
        &ctx,
        &[
            "proof",
            "biz",
            "referrals",
            "create",
            "--name",
            "Spring",
            "--redirect-url",
            "https://example.com/welcome",
            "--use-branding",
        ],
    )
    .await
    .unwrap();
    let out = run(
        &ctx,
        &[
            "proof",
            "--raw",
            "biz",
            "referrals",
            "generate-link",
            "rc_1",
            "--expires-at",
            "2026-12-31T00:00:00Z",
        ],
    )
    .await
    .unwrap();
    assert_eq!(out, r#"{"url":"https://r.example/x"}"#);
}

#[tokio::test]
async fn test_integration_create_nests_configuration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/integrations"))
        .and(body_json(json!({
            "name": "DOCUTECH",
            "organization_id": "org_1",
            "configuration": {"account_id": "acct_9", "environment": "production"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"int_1"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server.uri());
    run(
        &ctx,
        &[
            "proof",
            "biz",
            "integrations",
            "create",
            "--name",
            "DOCUTECH",
            "--org-id",
            "org_1",
            "--account-id",
            "acct_9",
            "--environment",
            "production",
        ],
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_legacy_webhook_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/webhooks"))
        .and(header("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"url":"https://old.example"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server.uri());
    let out = run(&ctx, &["proof", "--raw", "biz", "webhooks", "legacy"])
        .await
        .unwrap();
    assert_eq!(out, r#"{"url":"https://old.example"}"#);
}

// ---------------------------------------------------------------------------
// Real estate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_real_estate_webhooks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mortgage/v2/webhooks"))
        .and(body_json(json!({
            "url": "https://hooks.example.com",
            "subscriptions": ["*"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"wh_re"}"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mortgage/v2/webhooks"))
        .and(query_param("offset", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"[]"#))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server.uri());
    run(&ctx, &["proof", "re", "webhooks", "create", "https://hooks.example.com"])
        .await
        .unwrap();
    run(&ctx, &["proof", "re", "wh", "list", "--offset", "10"])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_verify_address_wraps_street_address() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mortgage/v2/transactions/verify_address"))
        .and(body_json(json!({
            "street_address": {
                "line1": "1 Main St",
                "city": "Denver",
                "state": "CO",
                "postal_code": "80202"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"valid":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server.uri());
    run(
        &ctx,
        &[
            "proof",
            "re",
            "verify-address",
            "--line1",
            "1 Main St",
            "--city",
            "Denver",
            "--state",
            "CO",
            "--postal-code",
            "80202",
        ],
    )
    .await
    .unwrap();
}

// ---------------------------------------------------------------------------
// SCIM and raw requests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_scim_create_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scim/v1/organizations/org_1/Users/"))
        .and(header("content-type", "application/scim+json"))
        .and(body_json(json!({
            "userName": "ada@example.com",
            "name": {"givenName": "Ada", "familyName": "Lovelace"},
            "roles": [{"value": "admin", "primary": true}],
            "active": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":"u_1"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server.uri());
    run(
        &ctx,
        &[
            "proof",
            "scim",
            "users",
            "create",
            "org_1",
            "--username",
            "ada@example.com",
            "--given-name",
            "Ada",
            "--family-name",
            "Lovelace",
            "--role",
            "admin",
        ],
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_scim_discovery_documents() {
    let server = MockServer::start().await;
    for route in ["Schemas/Users", "ServiceProviderConfig", "ResourceTypes"] {
        Mock::given(method("GET"))
            .and(path(format!("/scim/v1/organizations/org_1/{route}")))
            .and(header("accept", "application/scim+json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;
    }

    let ctx = context(&server.uri());
    for action in ["user", "service-provider-config", "resource-types"] {
        run(&ctx, &["proof", "scim", "schemas", action, "org_1"])
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_raw_request_passes_path_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/webhooks/wh_1"))
        .and(query_param("force", "true"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server.uri());
    let out = run(&ctx, &["proof", "request", "delete", "/v2/webhooks/wh_1?force=true"])
        .await
        .unwrap();
    assert_eq!(out, "");
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_config_commands_use_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    let ctx = Context::new(Some(config_path.clone())).unwrap();

    let out = run(&ctx, &["proof", "config", "set-api-key", "pk_live_123"])
        .await
        .unwrap();
    assert_eq!(out, "API key set successfully");

    let out = run(&ctx, &["proof", "config", "get"]).await.unwrap();
    assert!(out.contains("API Key: configured"), "{out}");
    assert!(!out.contains("pk_live_123"), "{out}");

    let stored = ctx.store().load().await.unwrap();
    assert_eq!(stored.api_key.as_deref(), Some("pk_live_123"));
    assert!(config_path.exists());
}

#[tokio::test]
async fn test_missing_credentials_fail_before_any_request() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryConfigStore::with_config(Config {
        api_endpoint: server.uri(),
        ..Config::default()
    }));
    let ctx = Context::with_store(store).with_api_key_override(None);

    let err = run(&ctx, &["proof", "biz", "tx", "get", "ot_1"])
        .await
        .unwrap_err();
    assert!(format!("{err:#}").to_lowercase().contains("api key"), "{err:#}");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
