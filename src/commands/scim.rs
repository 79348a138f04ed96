//! `proof scim users ...` and `proof scim schemas ...`

use clap::{Args, Subcommand};

use proof_client::api::scim::{self, ListUsersParams, PatchOperation, UserParams};
use proof_client::ProofClient;

use crate::output::Output;

#[derive(Debug, Subcommand)]
pub enum ScimResource {
    /// Organization users.
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Schema and service-provider discovery.
    Schemas {
        #[command(subcommand)]
        action: SchemaAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum SchemaAction {
    /// The user resource schema.
    User { organization_id: String },
    /// Supported SCIM features.
    ServiceProviderConfig { organization_id: String },
    /// Supported resource types.
    ResourceTypes { organization_id: String },
}

#[derive(Debug, Subcommand)]
pub enum UserAction {
    /// List users in an organization.
    #[command(visible_alias = "ls")]
    List {
        organization_id: String,
        #[arg(long, default_value_t = 1)]
        start_index: u32,
        #[arg(long, default_value_t = 50)]
        count: u32,
    },
    /// Get a user.
    Get {
        organization_id: String,
        user_id: String,
    },
    /// Provision a user.
    Create {
        organization_id: String,
        #[command(flatten)]
        user: UserArgs,
    },
    /// Replace a user.
    Update {
        organization_id: String,
        user_id: String,
        #[command(flatten)]
        user: UserArgs,
    },
    /// Patch a user with op:path[:value] operations.
    Patch {
        organization_id: String,
        user_id: String,
        /// e.g. `replace:active:false`. Repeat for several.
        #[arg(long = "operation", required = true)]
        operations: Vec<PatchOperation>,
    },
    /// Deprovision a user.
    Delete {
        organization_id: String,
        user_id: String,
    },
}

#[derive(Debug, Args)]
pub struct UserArgs {
    /// Email address used as the user name.
    #[arg(long)]
    pub username: String,
    #[arg(long, default_value = "")]
    pub given_name: String,
    #[arg(long, default_value = "")]
    pub family_name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    /// Role to assign. The first one is primary.
    #[arg(long = "role")]
    pub roles: Vec<String>,
    #[arg(long, default_value = "")]
    pub external_id: String,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub active: bool,
}

impl From<UserArgs> for UserParams {
    fn from(args: UserArgs) -> Self {
        let mut params = UserParams::new(
            &args.username,
            &args.given_name,
            &args.family_name,
            &args.email,
            &args.roles,
            args.active,
        );
        params.external_id = args.external_id;
        params
    }
}

pub async fn handle(resource: ScimResource, client: &ProofClient) -> anyhow::Result<Output> {
    let body = match resource {
        ScimResource::Users { action } => user(action, client).await?,
        ScimResource::Schemas { action } => schema(action, client).await?,
    };
    Ok(Output::body(body))
}

async fn user(action: UserAction, client: &ProofClient) -> anyhow::Result<Vec<u8>> {
    let body = match action {
        UserAction::List {
            organization_id,
            start_index,
            count,
        } => {
            let params = ListUsersParams { start_index, count };
            scim::list_users(client, &organization_id, &params).await?
        }
        UserAction::Get {
            organization_id,
            user_id,
        } => scim::get_user(client, &organization_id, &user_id).await?,
        UserAction::Create {
            organization_id,
            user,
        } => scim::create_user(client, &organization_id, &user.into()).await?,
        UserAction::Update {
            organization_id,
            user_id,
            user,
        } => scim::update_user(client, &organization_id, &user_id, &user.into()).await?,
        UserAction::Patch {
            organization_id,
            user_id,
            operations,
        } => scim::patch_user(client, &organization_id, &user_id, &operations).await?,
        UserAction::Delete {
            organization_id,
            user_id,
        } => scim::delete_user(client, &organization_id, &user_id).await?,
    };
    Ok(body.to_vec())
}

async fn schema(action: SchemaAction, client: &ProofClient) -> anyhow::Result<Vec<u8>> {
    let body = match action {
        SchemaAction::User { organization_id } => {
            scim::get_user_schema(client, &organization_id).await?
        }
        SchemaAction::ServiceProviderConfig { organization_id } => {
            scim::get_service_provider_config(client, &organization_id).await?
        }
        SchemaAction::ResourceTypes { organization_id } => {
            scim::get_resource_types(client, &organization_id).await?
        }
    };
    Ok(body.to_vec())
}
