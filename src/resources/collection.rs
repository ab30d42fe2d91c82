//! `directus_collection`: user-defined collections at `/collections`.
//!
//! A collection is addressed by its own name, chosen by the caller. The name
//! cannot be changed in place; renaming means destroying and recreating.

use crate::client::{Client, Envelope};
use crate::context::CallContext;
use crate::error::{Error, Operation, Result};
use crate::models::{CollectionConfig, CollectionWire};

use super::{ManagedResource, Warning};

const COLLECTION: &str = "collections";

/// Orchestrates CRUD for Directus collections
#[derive(Debug, Clone)]
pub struct CollectionResource {
    client: Client,
}

impl CollectionResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Whether moving from `state` to `plan` needs a destroy and create.
    pub fn requires_replacement(state: &CollectionConfig, plan: &CollectionConfig) -> bool {
        state.collection != plan.collection
    }

    fn fetch(&self, ctx: &CallContext, name: &str) -> Result<CollectionConfig> {
        let response: Envelope<CollectionWire> = self.client.get(ctx, COLLECTION, name)?;
        Ok(CollectionConfig::from_wire(response.data))
    }
}

fn require_collection(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Validation {
            message: "collection is required".to_string(),
        });
    }
    Ok(())
}

impl ManagedResource for CollectionResource {
    type State = CollectionConfig;

    const KIND: &'static str = "collection";
    const TYPE_NAME: &'static str = "directus_collection";

    fn create(&self, ctx: &CallContext, plan: &CollectionConfig) -> Result<CollectionConfig> {
        let name = plan.collection.as_str();
        let wrap = |e: Error| e.in_resource(Operation::Create, Self::KIND, Some(name));
        require_collection(name).map_err(wrap)?;

        let response: Envelope<CollectionWire> = self
            .client
            .create(ctx, COLLECTION, &plan.to_create_payload())
            .map_err(wrap)?;
        log::debug!("created collection {}", name);
        Ok(CollectionConfig::from_wire(response.data))
    }

    fn read(&self, ctx: &CallContext, state: &CollectionConfig) -> Result<CollectionConfig> {
        let name = state.collection.as_str();
        let wrap = |e: Error| e.in_resource(Operation::Read, Self::KIND, Some(name));
        require_collection(name).map_err(wrap)?;

        let mut current = self.fetch(ctx, name).map_err(wrap)?;
        current.collection = state.collection.clone();
        Ok(current)
    }

    fn update(&self, ctx: &CallContext, plan: &CollectionConfig) -> Result<CollectionConfig> {
        let name = plan.collection.as_str();
        let wrap = |e: Error| e.in_resource(Operation::Update, Self::KIND, Some(name));
        require_collection(name).map_err(wrap)?;

        let response: Envelope<CollectionWire> = self
            .client
            .update(ctx, COLLECTION, name, &plan.to_update_payload())
            .map_err(wrap)?;
        let mut updated = CollectionConfig::from_wire(response.data);
        updated.collection = plan.collection.clone();
        Ok(updated)
    }

    fn delete(&self, ctx: &CallContext, state: &CollectionConfig) -> Result<Vec<Warning>> {
        let name = state.collection.as_str();
        let wrap = |e: Error| e.in_resource(Operation::Delete, Self::KIND, Some(name));
        require_collection(name).map_err(wrap)?;

        self.client.delete(ctx, COLLECTION, name).map_err(wrap)?;
        Ok(Vec::new())
    }

    fn import(&self, ctx: &CallContext, name: &str) -> Result<CollectionConfig> {
        let wrap = |e: Error| e.in_resource(Operation::Import, Self::KIND, Some(name));
        super::require_import_id(name).map_err(wrap)?;

        let mut current = self.fetch(ctx, name).map_err(wrap)?;
        current.collection = name.to_string();
        Ok(current)
    }
}
