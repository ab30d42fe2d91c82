//! Role to policies reconciliation against a mock Directus server.

mod common;

use std::collections::BTreeSet;

use common::*;
use directus_provider::context::CallContext;
use directus_provider::reconcile::{Reconciler, ROLE_POLICIES};
use directus_provider::resources::{ManagedResource, RolePoliciesAttachment};
use serde_json::json;

const PROJECTION: &str = "id,policies.id,policies.policy";

fn desired(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[test]
fn test_attach_to_empty_role() {
    let server = MockServer::start();
    let read = server.mock(|when, then| {
        when.method(GET)
            .path("/roles/R")
            .query_param("fields", PROJECTION)
            .header("authorization", bearer());
        then.status(200)
            .json_body(json!({"data": {"id": "R", "policies": []}}));
    });
    let write = server.mock(|when, then| {
        when.method(PATCH)
            .path("/roles/R")
            .json_body(json!({"policies": {"create": [{"policy": "P1"}, {"policy": "P2"}]}}));
        then.status(200).json_body(json!({"data": {"id": "R"}}));
    });

    let provider = provider_for(&server);
    let state = provider
        .role_policies()
        .create(
            &CallContext::background(),
            &RolePoliciesAttachment::new("R", ["P1", "P2"]),
        )
        .unwrap();

    assert_eq!(state.id.as_deref(), Some("R"));
    read.assert();
    write.assert();
}

#[test]
fn test_swap_one_policy() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/roles/R");
        then.status(200).json_body(json!({"data": {"id": "R", "policies": [
            {"id": "J1", "policy": "P1"},
            {"id": "J2", "policy": "P2"}
        ]}}));
    });
    let write = server.mock(|when, then| {
        when.method(PATCH).path("/roles/R").json_body(json!({"policies": {
            "create": [{"policy": "P3"}],
            "delete": ["J1"]
        }}));
        then.status(200).json_body(json!({"data": {"id": "R"}}));
    });

    let reconciler = Reconciler::new(provider_for(&server).client().clone(), ROLE_POLICIES);
    let plan = reconciler
        .reconcile(&CallContext::background(), "R", &desired(&["P2", "P3"]))
        .unwrap();

    assert_eq!(plan.create, vec!["P3"]);
    assert_eq!(plan.delete, vec!["J1"]);
    write.assert();
}

#[test]
fn test_detach_everything() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/roles/R");
        then.status(200).json_body(json!({"data": {"id": "R", "policies": [
            {"id": "J1", "policy": "P1"}
        ]}}));
    });
    let write = server.mock(|when, then| {
        when.method(PATCH)
            .path("/roles/R")
            .json_body(json!({"policies": {"delete": ["J1"]}}));
        then.status(200).json_body(json!({"data": {"id": "R"}}));
    });

    let provider = provider_for(&server);
    let warnings = provider
        .role_policies()
        .delete(
            &CallContext::background(),
            &RolePoliciesAttachment::new("R", ["P1"]),
        )
        .unwrap();

    assert!(warnings.is_empty());
    write.assert();
}

#[test]
fn test_matching_sets_write_nothing() {
    let server = MockServer::start();
    let read = server.mock(|when, then| {
        when.method(GET).path("/roles/R");
        then.status(200).json_body(json!({"data": {"id": "R", "policies": [
            {"id": "J1", "policy": "P1"},
            {"id": "J2", "policy": "P2"}
        ]}}));
    });
    let write = server.mock(|when, then| {
        when.method(PATCH).path("/roles/R");
        then.status(200).json_body(json!({"data": {"id": "R"}}));
    });

    let provider = provider_for(&server);
    let plan = RolePoliciesAttachment::new("R", ["P2", "P1"]);
    provider
        .role_policies()
        .update(&CallContext::background(), &plan)
        .unwrap();

    read.assert();
    write.assert_calls(0);
}

#[test]
fn test_failed_read_blocks_write() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/roles/R");
        then.status(500).json_body(json!({
            "errors": [{"message": "boom", "extensions": {"code": "INTERNAL_SERVER_ERROR"}}]
        }));
    });
    let write = server.mock(|when, then| {
        when.method(PATCH).path("/roles/R");
        then.status(200).json_body(json!({"data": {"id": "R"}}));
    });

    let err = provider_for(&server)
        .role_policies()
        .create(
            &CallContext::background(),
            &RolePoliciesAttachment::new("R", ["P1"]),
        )
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    write.assert_calls(0);
}

#[test]
fn test_import_then_update_is_a_no_op() {
    let server = MockServer::start();
    let read = server.mock(|when, then| {
        when.method(GET).path("/roles/R");
        then.status(200).json_body(json!({"data": {"id": "R", "policies": [
            {"id": "J7", "policy": "P7"}
        ]}}));
    });
    let write = server.mock(|when, then| {
        when.method(PATCH).path("/roles/R");
        then.status(200).json_body(json!({"data": {"id": "R"}}));
    });

    let provider = provider_for(&server);
    let resource = provider.role_policies();
    let ctx = CallContext::background();

    let imported = resource.import(&ctx, "R").unwrap();
    assert_eq!(imported.policy_ids, desired(&["P7"]));
    resource.update(&ctx, &imported).unwrap();

    read.assert_calls(2);
    write.assert_calls(0);
}
