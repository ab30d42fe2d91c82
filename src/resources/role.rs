//! `directus_role`: roles at `/roles`, optionally nested under a parent.

use crate::client::{Client, Envelope};
use crate::context::CallContext;
use crate::error::{Error, Operation, Result};
use crate::models::{RoleConfig, RoleWire};

use super::{ManagedResource, Warning};

const COLLECTION: &str = "roles";

/// Orchestrates CRUD for Directus roles
#[derive(Debug, Clone)]
pub struct RoleResource {
    client: Client,
}

impl RoleResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn fetch(&self, ctx: &CallContext, id: &str) -> Result<RoleConfig> {
        let response: Envelope<RoleWire> = self.client.get(ctx, COLLECTION, id)?;
        Ok(RoleConfig::from_wire(response.data))
    }
}

impl ManagedResource for RoleResource {
    type State = RoleConfig;

    const KIND: &'static str = "role";
    const TYPE_NAME: &'static str = "directus_role";

    fn create(&self, ctx: &CallContext, plan: &RoleConfig) -> Result<RoleConfig> {
        let wrap = |e: Error| e.in_resource(Operation::Create, Self::KIND, None);
        super::require_name(&plan.name).map_err(wrap)?;

        let response: Envelope<RoleWire> = self
            .client
            .create(ctx, COLLECTION, &plan.to_create_payload())
            .map_err(wrap)?;
        let created = RoleConfig::from_wire(response.data);
        log::debug!("created role {:?}", created.id);
        Ok(created)
    }

    fn read(&self, ctx: &CallContext, state: &RoleConfig) -> Result<RoleConfig> {
        let id = super::stored_id(state.id.as_deref(), Operation::Read, Self::KIND)?;
        let mut current = self
            .fetch(ctx, id)
            .map_err(|e| e.in_resource(Operation::Read, Self::KIND, Some(id)))?;
        current.id = state.id.clone();
        Ok(current)
    }

    fn update(&self, ctx: &CallContext, plan: &RoleConfig) -> Result<RoleConfig> {
        let id = super::stored_id(plan.id.as_deref(), Operation::Update, Self::KIND)?;
        let wrap = |e: Error| e.in_resource(Operation::Update, Self::KIND, Some(id));
        super::require_name(&plan.name).map_err(wrap)?;

        let response: Envelope<RoleWire> = self
            .client
            .update(ctx, COLLECTION, id, &plan.to_update_payload())
            .map_err(wrap)?;
        Ok(RoleConfig::from_wire(response.data))
    }

    /// Deleting a role with children leaves them orphaned; that is reported
    /// as a warning rather than refused.
    fn delete(&self, ctx: &CallContext, state: &RoleConfig) -> Result<Vec<Warning>> {
        let id = super::stored_id(state.id.as_deref(), Operation::Delete, Self::KIND)?;

        let mut warnings = Vec::new();
        let children = state.child_count();
        if children > 0 {
            log::warn!("role {} still has {} child role(s)", id, children);
            warnings.push(Warning::new(
                "Deleting Role with Children",
                format!(
                    "This role has {} child role(s). The children will become orphaned.",
                    children
                ),
            ));
        }

        self.client
            .delete(ctx, COLLECTION, id)
            .map_err(|e| e.in_resource(Operation::Delete, Self::KIND, Some(id)))?;
        Ok(warnings)
    }

    fn import(&self, ctx: &CallContext, id: &str) -> Result<RoleConfig> {
        let wrap = |e: Error| e.in_resource(Operation::Import, Self::KIND, Some(id));
        super::require_import_id(id).map_err(wrap)?;
        self.fetch(ctx, id).map_err(wrap)
    }
}
