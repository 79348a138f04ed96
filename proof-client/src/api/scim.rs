//! SCIM user provisioning: `/scim/v1/organizations/{org}/Users`, plus the
//! schema and service-provider discovery documents.
//!
//! Every call negotiates `application/scim+json`.

use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::client::ProofClient;
use crate::error::{Error, Result};
use crate::query::{with_query, QueryBuilder, QueryParams};
use crate::transport::RequestOptions;

/// Base path.
pub const SCIM_ENDPOINT: &str = "/scim/v1/organizations";

/// Paging for [`list_users`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUsersParams {
    /// 1-based index of the first result.
    pub start_index: u32,
    pub count: u32,
}

impl QueryParams for ListUsersParams {
    fn write_query(&self, query: &mut QueryBuilder) {
        query
            .int("startIndex", self.start_index)
            .int("count", self.count);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserName {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub given_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub family_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiValue {
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub primary: bool,
}

/// Body for [`create_user`] and [`update_user`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserParams {
    /// Email address used as the user name.
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<UserName>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<MultiValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<MultiValue>,
    /// Identifier from the SAML provider.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub external_id: String,
    pub active: bool,
}

impl UserParams {
    /// Assemble a user. Empty names are left out, the first role is primary.
    pub fn new(
        user_name: &str,
        given_name: &str,
        family_name: &str,
        email: &str,
        roles: &[String],
        active: bool,
    ) -> Self {
        let name = (!given_name.is_empty() || !family_name.is_empty()).then(|| UserName {
            given_name: given_name.to_string(),
            family_name: family_name.to_string(),
        });
        let emails = if email.is_empty() {
            Vec::new()
        } else {
            vec![MultiValue {
                value: email.to_string(),
                primary: true,
            }]
        };
        let roles = roles
            .iter()
            .enumerate()
            .map(|(i, role)| MultiValue {
                value: role.clone(),
                primary: i == 0,
            })
            .collect();
        Self {
            user_name: user_name.to_string(),
            name,
            emails,
            roles,
            external_id: String::new(),
            active,
        }
    }
}

/// One SCIM patch operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchOperation {
    /// `add`, `remove` or `replace`.
    pub op: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl std::str::FromStr for PatchOperation {
    type Err = Error;

    /// Parse `op:path[:value]`. A value that is valid JSON is sent as JSON,
    /// anything else as a string.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let (Some(op), Some(path)) = (parts.next(), parts.next()) else {
            return Err(Error::InvalidInput(format!(
                "invalid operation '{}', expected op:path[:value]",
                s
            )));
        };
        let value = parts.next().map(|raw| {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        });
        Ok(Self {
            op: op.to_string(),
            path: path.to_string(),
            value,
        })
    }
}

#[derive(Serialize)]
struct PatchBody<'a> {
    schemas: [&'static str; 1],
    #[serde(rename = "Operations")]
    operations: &'a [PatchOperation],
}

const PATCH_OP_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

fn organization(organization_id: &str) -> String {
    format!("{}/{}", SCIM_ENDPOINT, organization_id)
}

fn users(organization_id: &str) -> String {
    format!("{}/Users", organization(organization_id))
}

fn user(organization_id: &str, user_id: &str) -> String {
    format!("{}/{}", users(organization_id), user_id)
}

async fn send<B: Serialize + ?Sized>(
    client: &ProofClient,
    method: Method,
    path: &str,
    body: Option<&B>,
) -> Result<Bytes> {
    client
        .request(method, path, body, &RequestOptions::scim())
        .await
}

/// List users of an organization.
pub async fn list_users(
    client: &ProofClient,
    organization_id: &str,
    params: &ListUsersParams,
) -> Result<Bytes> {
    let path = with_query(&users(organization_id), params);
    send::<()>(client, Method::GET, &path, None).await
}

/// Fetch one user.
pub async fn get_user(client: &ProofClient, organization_id: &str, user_id: &str) -> Result<Bytes> {
    send::<()>(client, Method::GET, &user(organization_id, user_id), None).await
}

/// Provision a user.
pub async fn create_user(
    client: &ProofClient,
    organization_id: &str,
    params: &UserParams,
) -> Result<Bytes> {
    let path = format!("{}/", users(organization_id));
    send(client, Method::POST, &path, Some(params)).await
}

/// Replace a user.
pub async fn update_user(
    client: &ProofClient,
    organization_id: &str,
    user_id: &str,
    params: &UserParams,
) -> Result<Bytes> {
    send(client, Method::PUT, &user(organization_id, user_id), Some(params)).await
}

/// Apply patch operations to a user.
pub async fn patch_user(
    client: &ProofClient,
    organization_id: &str,
    user_id: &str,
    operations: &[PatchOperation],
) -> Result<Bytes> {
    let body = PatchBody {
        schemas: [PATCH_OP_SCHEMA],
        operations,
    };
    send(client, Method::PATCH, &user(organization_id, user_id), Some(&body)).await
}

/// Deprovision a user.
pub async fn delete_user(client: &ProofClient, organization_id: &str, user_id: &str) -> Result<Bytes> {
    send::<()>(client, Method::DELETE, &user(organization_id, user_id), None).await
}

/// The SCIM user schema: `Schemas/Users`.
pub async fn get_user_schema(client: &ProofClient, organization_id: &str) -> Result<Bytes> {
    let path = format!("{}/Schemas/Users", organization(organization_id));
    send::<()>(client, Method::GET, &path, None).await
}

/// Supported SCIM features: `ServiceProviderConfig`.
pub async fn get_service_provider_config(
    client: &ProofClient,
    organization_id: &str,
) -> Result<Bytes> {
    let path = format!("{}/ServiceProviderConfig", organization(organization_id));
    send::<()>(client, Method::GET, &path, None).await
}

/// Supported SCIM resource types: `ResourceTypes`.
pub async fn get_resource_types(client: &ProofClient, organization_id: &str) -> Result<Bytes> {
    let path = format!("{}/ResourceTypes", organization(organization_id));
    send::<()>(client, Method::GET, &path, None).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_users_query() {
        let params = ListUsersParams {
            start_index: 1,
            count: 50,
        };
        assert_eq!(
            with_query(&users("org_1"), &params),
            "/scim/v1/organizations/org_1/Users?startIndex=1&count=50"
        );
    }

    #[test]
    fn test_user_params_json() {
        let roles = vec!["admin".to_string(), "employee".to_string()];
        let params = UserParams::new("ada@example.com", "Ada", "", "ada@example.com", &roles, true);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "userName": "ada@example.com",
                "name": {"givenName": "Ada"},
                "emails": [{"value": "ada@example.com", "primary": true}],
                "roles": [{"value": "admin", "primary": true}, {"value": "employee"}],
                "active": true
            })
        );

        let bare = UserParams::new("bob@example.com", "", "", "", &[], false);
        assert_eq!(
            serde_json::to_value(&bare).unwrap(),
            json!({"userName": "bob@example.com", "active": false})
        );
    }

    #[test]
    fn test_parse_patch_operation() {
        let op: PatchOperation = "replace:active:false".parse().unwrap();
        assert_eq!(op.value, Some(Value::Bool(false)));

        let op: PatchOperation = "replace:name.givenName:Ada".parse().unwrap();
        assert_eq!(op.path, "name.givenName");
        assert_eq!(op.value, Some(Value::String("Ada".into())));

        let op: PatchOperation = "remove:emails".parse().unwrap();
        assert_eq!(op.value, None);

        let err = "replace".parse::<PatchOperation>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_patch_body() {
        let ops = vec!["replace:active:false".parse::<PatchOperation>().unwrap()];
        let body = PatchBody {
            schemas: [PATCH_OP_SCHEMA],
            operations: &ops,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
                "Operations": [{"op": "replace", "path": "active", "value": false}]
            })
        );
    }
}
