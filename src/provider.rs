//! Provider entry point: one validated configuration, one shared `Client`,
//! and the orchestrators built on top of it.

use crate::client::Client;
use crate::config::ProviderConfig;
use crate::context::CallContext;
use crate::error::Result;
use crate::resources::{
    CollectionResource, ManagedResource, PolicyResource, RoleResource,
    RolePoliciesAttachmentResource,
};

/// Configured provider handing out resource orchestrators
#[derive(Debug, Clone)]
pub struct Provider {
    client: Client,
}

impl Provider {
    /// Provider type name, the prefix of every resource type name.
    pub const TYPE_NAME: &'static str = "directus";

    /// Validates `config` and builds the shared HTTP client.
    pub fn configure(config: ProviderConfig) -> Result<Self> {
        config.validate()?;
        log::debug!("configuring provider for {}", config.base_url());
        Ok(Self::from_client(Client::new(&config)?))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Checks that the configured instance is reachable.
    pub fn ping(&self, ctx: &CallContext) -> Result<()> {
        self.client.ping(ctx)
    }

    pub fn policies(&self) -> PolicyResource {
        PolicyResource::new(self.client.clone())
    }

    pub fn roles(&self) -> RoleResource {
        RoleResource::new(self.client.clone())
    }

    pub fn collections(&self) -> CollectionResource {
        CollectionResource::new(self.client.clone())
    }

    pub fn role_policies(&self) -> RolePoliciesAttachmentResource {
        RolePoliciesAttachmentResource::new(self.client.clone())
    }

    /// Type names of every managed resource.
    pub fn resource_type_names() -> [&'static str; 4] {
        [
            PolicyResource::TYPE_NAME,
            RoleResource::TYPE_NAME,
            CollectionResource::TYPE_NAME,
            RolePoliciesAttachmentResource::TYPE_NAME,
        ]
    }
}
