//! `directus_role_policies_attachment`: the full set of policies linked to a
//! role, managed authoritatively.
//!
//! The attachment has no remote object of its own. Its id is the role id,
//! and every operation goes through the relation `Reconciler`: create and
//! update converge onto the configured set, delete converges onto the empty
//! set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::context::CallContext;
use crate::error::{Error, Operation, Result};
use crate::reconcile::{Reconciler, ROLE_POLICIES};

use super::{ManagedResource, Warning};

/// Policies attached to one role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePoliciesAttachment {
    /// Mirrors `role_id` once created or imported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role_id: String,
    #[serde(default)]
    pub policy_ids: BTreeSet<String>,
}

impl RolePoliciesAttachment {
    pub fn new<I, S>(role_id: impl Into<String>, policy_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: None,
            role_id: role_id.into(),
            policy_ids: policy_ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Orchestrates the role to policies attachment
#[derive(Debug, Clone)]
pub struct RolePoliciesAttachmentResource {
    reconciler: Reconciler,
}

impl RolePoliciesAttachmentResource {
    pub fn new(client: Client) -> Self {
        Self::with_reconciler(Reconciler::new(client, ROLE_POLICIES))
    }

    /// Uses a preconfigured reconciler, e.g. one with a custom projection.
    pub fn with_reconciler(reconciler: Reconciler) -> Self {
        Self { reconciler }
    }

    fn converge(
        &self,
        ctx: &CallContext,
        plan: &RolePoliciesAttachment,
        operation: Operation,
    ) -> Result<RolePoliciesAttachment> {
        let role_id = plan.role_id.as_str();
        let wrap = |e: Error| e.in_resource(operation, Self::KIND, Some(role_id));
        require_role(role_id).map_err(wrap)?;

        self.reconciler
            .reconcile(ctx, role_id, &plan.policy_ids)
            .map_err(wrap)?;

        Ok(RolePoliciesAttachment {
            id: Some(plan.role_id.clone()),
            ..plan.clone()
        })
    }

    fn observe(&self, ctx: &CallContext, role_id: &str) -> Result<RolePoliciesAttachment> {
        let records = self.reconciler.observe(ctx, role_id)?;
        Ok(RolePoliciesAttachment {
            id: Some(role_id.to_string()),
            role_id: role_id.to_string(),
            policy_ids: records.into_iter().map(|record| record.related).collect(),
        })
    }
}

fn require_role(role_id: &str) -> Result<()> {
    if role_id.is_empty() {
        return Err(Error::Validation {
            message: "role_id is required".to_string(),
        });
    }
    Ok(())
}

impl ManagedResource for RolePoliciesAttachmentResource {
    type State = RolePoliciesAttachment;

    const KIND: &'static str = "role policies attachment";
    const TYPE_NAME: &'static str = "directus_role_policies_attachment";

    fn create(
        &self,
        ctx: &CallContext,
        plan: &RolePoliciesAttachment,
    ) -> Result<RolePoliciesAttachment> {
        self.converge(ctx, plan, Operation::Create)
    }

    fn read(
        &self,
        ctx: &CallContext,
        state: &RolePoliciesAttachment,
    ) -> Result<RolePoliciesAttachment> {
        let role_id = state.role_id.as_str();
        let wrap = |e: Error| e.in_resource(Operation::Read, Self::KIND, Some(role_id));
        require_role(role_id).map_err(wrap)?;
        self.observe(ctx, role_id).map_err(wrap)
    }

    fn update(
        &self,
        ctx: &CallContext,
        plan: &RolePoliciesAttachment,
    ) -> Result<RolePoliciesAttachment> {
        self.converge(ctx, plan, Operation::Update)
    }

    fn delete(&self, ctx: &CallContext, state: &RolePoliciesAttachment) -> Result<Vec<Warning>> {
        let detached = RolePoliciesAttachment {
            policy_ids: BTreeSet::new(),
            ..state.clone()
        };
        self.converge(ctx, &detached, Operation::Delete)?;
        Ok(Vec::new())
    }

    /// Imports by role id, taking the currently linked policies as the
    /// desired set so the next apply plans no changes.
    fn import(&self, ctx: &CallContext, role_id: &str) -> Result<RolePoliciesAttachment> {
        let wrap = |e: Error| e.in_resource(Operation::Import, Self::KIND, Some(role_id));
        super::require_import_id(role_id).map_err(wrap)?;
        self.observe(ctx, role_id).map_err(wrap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Method;
    use crate::test_support::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn resource(mock: &Arc<MockTransport>) -> RolePoliciesAttachmentResource {
        RolePoliciesAttachmentResource::new(Client::with_transport(mock.clone()))
    }

    fn linked(rows: serde_json::Value) -> serde_json::Value {
        json!({"data": {"id": "R", "policies": rows}})
    }

    #[test]
    fn test_create_links_configured_policies() {
        let mock = MockTransport::new();
        mock.respond_json(linked(json!([])));
        mock.respond_json(json!({"data": {"id": "R"}}));

        let state = resource(&mock)
            .create(
                &CallContext::background(),
                &RolePoliciesAttachment::new("R", ["P2", "P1"]),
            )
            .unwrap();
        assert_eq!(state.id.as_deref(), Some("R"));
        assert_eq!(state.policy_ids.len(), 2);

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].path, "/roles/R?fields=id%2Cpolicies.id%2Cpolicies.policy");
        assert_eq!(calls[1].method, Method::Patch);
        assert_eq!(
            calls[1].body,
            Some(json!({"policies": {"create": [{"policy": "P1"}, {"policy": "P2"}]}}))
        );
    }

    #[test]
    fn test_update_with_matching_set_reads_only() {
        let mock = MockTransport::new();
        mock.respond_json(linked(json!([{"id": "J1", "policy": "P1"}])));

        let plan = RolePoliciesAttachment {
            id: Some("R".to_string()),
            ..RolePoliciesAttachment::new("R", ["P1"])
        };
        resource(&mock)
            .update(&CallContext::background(), &plan)
            .unwrap();
        assert!(mock.writes().is_empty());
    }

    #[test]
    fn test_read_reflects_observed_links() {
        let mock = MockTransport::new();
        mock.respond_json(linked(json!([
            {"id": "J1", "policy": "P1"},
            {"id": "J3", "policy": "P3"}
        ])));

        let state = resource(&mock)
            .read(
                &CallContext::background(),
                &RolePoliciesAttachment::new("R", ["P1", "P2"]),
            )
            .unwrap();
        assert_eq!(
            state.policy_ids,
            BTreeSet::from(["P1".to_string(), "P3".to_string()])
        );
    }

    #[test]
    fn test_delete_unlinks_everything() {
        let mock = MockTransport::new();
        mock.respond_json(linked(json!([
            {"id": "J1", "policy": "P1"},
            {"id": "J2", "policy": "P2"}
        ])));
        mock.respond_json(json!({"data": {"id": "R"}}));

        let warnings = resource(&mock)
            .delete(
                &CallContext::background(),
                &RolePoliciesAttachment::new("R", ["P1", "P2"]),
            )
            .unwrap();
        assert!(warnings.is_empty());

        let writes = mock.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(
            writes[0].body,
            Some(json!({"policies": {"delete": ["J1", "J2"]}}))
        );
    }

    #[test]
    fn test_import_fills_desired_set() {
        let mock = MockTransport::new();
        mock.respond_json(linked(json!([{"id": "J1", "policy": "P1"}])));

        let state = resource(&mock)
            .import(&CallContext::background(), "R")
            .unwrap();
        assert_eq!(state.id.as_deref(), Some("R"));
        assert_eq!(state.role_id, "R");
        assert_eq!(state.policy_ids, BTreeSet::from(["P1".to_string()]));
    }

    #[test]
    fn test_failure_names_role() {
        let mock = MockTransport::new();
        mock.respond_error(403, "FORBIDDEN", "You don't have permission to access this.");

        let err = resource(&mock)
            .create(
                &CallContext::background(),
                &RolePoliciesAttachment::new("R", ["P1"]),
            )
            .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Could not create role policies attachment R:"));
        assert_eq!(err.status(), Some(403));
        assert!(mock.writes().is_empty());
    }

    #[test]
    fn test_empty_role_is_rejected_locally() {
        let mock = MockTransport::new();
        let err = resource(&mock)
            .update(
                &CallContext::background(),
                &RolePoliciesAttachment::new("", ["P1"]),
            )
            .unwrap_err();
        assert!(err.to_string().contains("role_id is required"));
        assert!(mock.calls().is_empty());
    }
}
