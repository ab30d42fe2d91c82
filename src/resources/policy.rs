//! `directus_policy`: access policies at `/policies`.

use crate::client::{Client, Envelope};
use crate::context::CallContext;
use crate::error::{Error, Operation, Result};
use crate::models::{PolicyConfig, PolicyWire};

use super::{ManagedResource, Warning};

const COLLECTION: &str = "policies";

/// Orchestrates CRUD for Directus policies
#[derive(Debug, Clone)]
pub struct PolicyResource {
    client: Client,
}

impl PolicyResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn fetch(&self, ctx: &CallContext, id: &str) -> Result<PolicyConfig> {
        let response: Envelope<PolicyWire> = self.client.get(ctx, COLLECTION, id)?;
        Ok(PolicyConfig::from_wire(response.data))
    }
}

impl ManagedResource for PolicyResource {
    type State = PolicyConfig;

    const KIND: &'static str = "policy";
    const TYPE_NAME: &'static str = "directus_policy";

    fn create(&self, ctx: &CallContext, plan: &PolicyConfig) -> Result<PolicyConfig> {
        let wrap = |e: Error| e.in_resource(Operation::Create, Self::KIND, None);
        super::require_name(&plan.name).map_err(wrap)?;

        let response: Envelope<PolicyWire> = self
            .client
            .create(ctx, COLLECTION, &plan.to_payload())
            .map_err(wrap)?;
        let created = PolicyConfig::from_wire(response.data);
        log::debug!("created policy {:?}", created.id);
        Ok(created)
    }

    fn read(&self, ctx: &CallContext, state: &PolicyConfig) -> Result<PolicyConfig> {
        let id = super::stored_id(state.id.as_deref(), Operation::Read, Self::KIND)?;
        let mut current = self
            .fetch(ctx, id)
            .map_err(|e| e.in_resource(Operation::Read, Self::KIND, Some(id)))?;
        current.id = state.id.clone();
        Ok(current)
    }

    fn update(&self, ctx: &CallContext, plan: &PolicyConfig) -> Result<PolicyConfig> {
        let id = super::stored_id(plan.id.as_deref(), Operation::Update, Self::KIND)?;
        let wrap = |e: Error| e.in_resource(Operation::Update, Self::KIND, Some(id));
        super::require_name(&plan.name).map_err(wrap)?;

        let response: Envelope<PolicyWire> = self
            .client
            .update(ctx, COLLECTION, id, &plan.to_payload())
            .map_err(wrap)?;
        Ok(PolicyConfig::from_wire(response.data))
    }

    fn delete(&self, ctx: &CallContext, state: &PolicyConfig) -> Result<Vec<Warning>> {
        let id = super::stored_id(state.id.as_deref(), Operation::Delete, Self::KIND)?;
        self.client
            .delete(ctx, COLLECTION, id)
            .map_err(|e| e.in_resource(Operation::Delete, Self::KIND, Some(id)))?;
        Ok(Vec::new())
    }

    fn import(&self, ctx: &CallContext, id: &str) -> Result<PolicyConfig> {
        let wrap = |e: Error| e.in_resource(Operation::Import, Self::KIND, Some(id));
        super::require_import_id(id).map_err(wrap)?;
        self.fetch(ctx, id).map_err(wrap)
    }
}
