//! # Authoritative Relation Reconciliation
//!
//! Directus links roles and policies through a junction collection
//! (`directus_access`). Each junction row has its own id, separate from both
//! the role and the policy. This module converges the set of policies linked
//! to a role onto a desired set with the fewest writes possible.
//!
//! ## Algorithm
//!
//! 1.  Read the owner with a minimal projection
//!     (`id,policies.id,policies.policy`) to get the current junction rows.
//! 2.  Index them by related id.
//! 3.  Create a row for every desired id missing from the index.
//! 4.  Delete every row whose related id is not desired.
//! 5.  If there is nothing to create or delete, stop: no write at all.
//! 6.  Otherwise send exactly one `PATCH` on the owner carrying both lists.
//!
//! The computation (`RelationPlan::compute`) is pure and has no notion of
//! create, update or delete; callers express those by what they pass as the
//! desired set (configured set, new set, empty set). Observed state is never
//! cached, so a second run with the same desired set reads the first run's
//! result and writes nothing.
//!
//! There is no rollback. If the read fails nothing is written; if the write
//! fails the remote state is whatever the service left behind.

use std::collections::{BTreeSet, HashMap};

use serde_json::{json, Map, Value};

use crate::client::{Client, Envelope};
use crate::context::CallContext;
use crate::error::{Error, Result};

/// Describes a many-to-many relation reachable through an owner's alias field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationSpec {
    /// Collection holding the owner, e.g. `roles`.
    pub owner_collection: &'static str,
    /// Alias field on the owner listing the junction rows, e.g. `policies`.
    pub field: &'static str,
    /// Junction column referencing the related item, e.g. `policy`.
    pub related_key: &'static str,
    projection: Option<String>,
}

impl RelationSpec {
    pub const fn new(
        owner_collection: &'static str,
        field: &'static str,
        related_key: &'static str,
    ) -> Self {
        Self {
            owner_collection,
            field,
            related_key,
            projection: None,
        }
    }

    /// Override the `fields` projection used to read junction rows.
    pub fn with_projection(mut self, projection: impl Into<String>) -> Self {
        self.projection = Some(projection.into());
        self
    }

    /// `fields` query value requesting only the junction id and related id.
    pub fn projection(&self) -> String {
        match &self.projection {
            Some(projection) => projection.clone(),
            None => format!(
                "id,{field}.id,{field}.{key}",
                field = self.field,
                key = self.related_key
            ),
        }
    }
}

/// Role to policy links via `directus_access`
pub const ROLE_POLICIES: RelationSpec = RelationSpec::new("roles", "policies", "policy");

/// One junction row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRecord {
    /// Junction row id, assigned by the server.
    pub id: String,
    /// Id of the related item.
    pub related: String,
}

impl RelationRecord {
    pub fn new(id: impl Into<String>, related: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            related: related.into(),
        }
    }
}

/// Minimal set of junction changes converging observed onto desired
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationPlan {
    /// Related ids to link, ascending.
    pub create: Vec<String>,
    /// Junction row ids to remove, in observed order.
    pub delete: Vec<String>,
}

impl RelationPlan {
    pub fn compute(desired: &BTreeSet<String>, observed: &[RelationRecord]) -> Self {
        let index: HashMap<&str, &str> = observed
            .iter()
            .map(|record| (record.related.as_str(), record.id.as_str()))
            .collect();

        let create = desired
            .iter()
            .filter(|id| !index.contains_key(id.as_str()))
            .cloned()
            .collect();

        let delete = observed
            .iter()
            .filter(|record| !desired.contains(&record.related))
            .map(|record| record.id.clone())
            .collect();

        Self { create, delete }
    }

    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.delete.is_empty()
    }

    /// Nested update body: `{field: {create?: [{key: id}], delete?: [row ids]}}`.
    ///
    /// Each list is present only when non-empty.
    pub fn to_body(&self, relation: &RelationSpec) -> Value {
        let mut ops = Map::new();
        if !self.create.is_empty() {
            let create: Vec<Value> = self
                .create
                .iter()
                .map(|id| {
                    let mut entry = Map::new();
                    entry.insert(relation.related_key.to_string(), Value::String(id.clone()));
                    Value::Object(entry)
                })
                .collect();
            ops.insert("create".to_string(), Value::Array(create));
        }
        if !self.delete.is_empty() {
            ops.insert("delete".to_string(), json!(self.delete));
        }

        let mut body = Map::new();
        body.insert(relation.field.to_string(), Value::Object(ops));
        Value::Object(body)
    }
}

/// Reads and converges one relation through a `Client`
#[derive(Debug, Clone)]
pub struct Reconciler {
    client: Client,
    relation: RelationSpec,
}

impl Reconciler {
    pub fn new(client: Client, relation: RelationSpec) -> Self {
        Self { client, relation }
    }

    pub fn relation(&self) -> &RelationSpec {
        &self.relation
    }

    /// Current junction rows of `owner`.
    pub fn observe(&self, ctx: &CallContext, owner: &str) -> Result<Vec<RelationRecord>> {
        require_owner(owner)?;
        self.read_records(ctx, owner)
            .map_err(|e| self.read_error(owner, e))
    }

    /// Converge the relation of `owner` onto `desired`.
    ///
    /// Returns the plan that was written; an empty plan means no request
    /// beyond the read was sent.
    pub fn reconcile(
        &self,
        ctx: &CallContext,
        owner: &str,
        desired: &BTreeSet<String>,
    ) -> Result<RelationPlan> {
        let observed = self.observe(ctx, owner)?;
        let plan = RelationPlan::compute(desired, &observed);

        if plan.is_empty() {
            log::debug!(
                "{} of {} {} already match ({} linked)",
                self.relation.field,
                self.relation.owner_collection,
                owner,
                observed.len()
            );
            return Ok(plan);
        }

        log::info!(
            "updating {} of {} {}: {} to link, {} to unlink",
            self.relation.field,
            self.relation.owner_collection,
            owner,
            plan.create.len(),
            plan.delete.len()
        );

        self.client
            .patch(
                ctx,
                self.relation.owner_collection,
                owner,
                &plan.to_body(&self.relation),
            )
            .map_err(|e| Error::ReconcileWrite {
                relation: self.relation.field.to_string(),
                owner: owner.to_string(),
                source: Box::new(e),
            })?;

        Ok(plan)
    }

    fn read_records(&self, ctx: &CallContext, owner: &str) -> Result<Vec<RelationRecord>> {
        let projection = self.relation.projection();
        let response: Envelope<Value> = self.client.get_with_params(
            ctx,
            self.relation.owner_collection,
            owner,
            &[("fields", projection.as_str())],
        )?;

        let rows = match response.data.get(self.relation.field) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(rows)) => rows,
            Some(other) => {
                return Err(Error::Decode {
                    path: format!("/{}/{}", self.relation.owner_collection, owner),
                    message: format!(
                        "expected '{}' to be an array, got {}",
                        self.relation.field, other
                    ),
                })
            }
        };

        rows.iter()
            .map(|row| -> Result<RelationRecord> {
                Ok(RelationRecord {
                    id: scalar(row, "id").ok_or_else(|| self.row_error(owner, row, "id"))?,
                    related: scalar(row, self.relation.related_key)
                        .ok_or_else(|| self.row_error(owner, row, self.relation.related_key))?,
                })
            })
            .collect()
    }

    fn row_error(&self, owner: &str, row: &Value, key: &str) -> Error {
        Error::Decode {
            path: format!("/{}/{}", self.relation.owner_collection, owner),
            message: format!("junction row without '{}': {}", key, row),
        }
    }

    fn read_error(&self, owner: &str, source: Error) -> Error {
        Error::ReconcileRead {
            relation: self.relation.field.to_string(),
            owner: owner.to_string(),
            source: Box::new(source),
        }
    }
}

fn require_owner(owner: &str) -> Result<()> {
    if owner.is_empty() {
        return Err(Error::Validation {
            message: "owner id is required".to_string(),
        });
    }
    Ok(())
}

/// Junction ids may be UUID strings or integers depending on the schema.
fn scalar(row: &Value, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
