//! Property-based tests for relation planning and entity mapping.
//!
//! These tests use proptest to generate random observed/desired sets and
//! configurations, and verify that invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use std::collections::BTreeSet;

    use crate::models::{
        CollectionConfig, CollectionWire, PolicyConfig, PolicyWire, RoleConfig, RoleWire,
    };
    use crate::reconcile::{RelationPlan, RelationRecord};
    use proptest::prelude::*;

    /// Observed junction rows with unique related ids and unique row ids.
    fn observed_strategy() -> impl Strategy<Value = Vec<RelationRecord>> {
        prop::collection::btree_set("P[0-9]{1,2}", 0..8).prop_map(|related| {
            related
                .into_iter()
                .enumerate()
                .map(|(i, id)| RelationRecord::new(format!("J{}", i), id))
                .collect()
        })
    }

    fn desired_strategy() -> impl Strategy<Value = BTreeSet<String>> {
        prop::collection::btree_set("P[0-9]{1,2}", 0..8)
    }

    /// Simulates the service applying `plan` to `observed`.
    fn apply(observed: &[RelationRecord], plan: &RelationPlan) -> Vec<RelationRecord> {
        let mut next: Vec<RelationRecord> = observed
            .iter()
            .filter(|record| !plan.delete.contains(&record.id))
            .cloned()
            .collect();
        for (i, related) in plan.create.iter().enumerate() {
            next.push(RelationRecord::new(format!("N{}", i), related.clone()));
        }
        next
    }

    // ============================================================================
    // RelationPlan property tests
    // ============================================================================

    proptest! {
        /// Property: creates are exactly desired minus observed
        #[test]
        fn plan_creates_exactly_missing(
            desired in desired_strategy(),
            observed in observed_strategy(),
        ) {
            let plan = RelationPlan::compute(&desired, &observed);
            let linked: BTreeSet<String> =
                observed.iter().map(|record| record.related.clone()).collect();
            let expected: Vec<String> = desired.difference(&linked).cloned().collect();
            prop_assert_eq!(plan.create, expected);
        }

        /// Property: deletes are exactly the rows whose related id is not desired
        #[test]
        fn plan_deletes_exactly_unwanted(
            desired in desired_strategy(),
            observed in observed_strategy(),
        ) {
            let plan = RelationPlan::compute(&desired, &observed);
            let expected: Vec<String> = observed
                .iter()
                .filter(|record| !desired.contains(&record.related))
                .map(|record| record.id.clone())
                .collect();
            prop_assert_eq!(plan.delete, expected);
        }

        /// Property: an observed set equal to the desired set plans nothing
        #[test]
        fn plan_is_empty_when_sets_match(observed in observed_strategy()) {
            let desired: BTreeSet<String> =
                observed.iter().map(|record| record.related.clone()).collect();
            prop_assert!(RelationPlan::compute(&desired, &observed).is_empty());
        }

        /// Property: applying a plan and recomputing yields an empty plan
        #[test]
        fn plan_is_idempotent(
            desired in desired_strategy(),
            observed in observed_strategy(),
        ) {
            let plan = RelationPlan::compute(&desired, &observed);
            let after = apply(&observed, &plan);

            let linked: BTreeSet<String> =
                after.iter().map(|record| record.related.clone()).collect();
            prop_assert_eq!(&linked, &desired);
            prop_assert!(RelationPlan::compute(&desired, &after).is_empty());
        }

        /// Property: a row is never both kept for a desired id and deleted
        #[test]
        fn plan_never_deletes_desired(
            desired in desired_strategy(),
            observed in observed_strategy(),
        ) {
            let plan = RelationPlan::compute(&desired, &observed);
            for record in &observed {
                if desired.contains(&record.related) {
                    prop_assert!(!plan.delete.contains(&record.id));
                }
            }
        }
    }

    // ============================================================================
    // Entity mapper round-trip property tests
    // ============================================================================

    fn text() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9 _-]{0,15}"
    }

    fn ip_entries() -> impl Strategy<Value = String> {
        prop::collection::vec("[0-9]{1,3}\\.[0-9]{1,3}\\.0\\.0/[0-9]{1,2}", 1..4)
            .prop_map(|entries| entries.join(","))
    }

    proptest! {
        /// Property: policy config survives payload -> wire -> config
        #[test]
        fn policy_round_trip(
            name in text(),
            icon in prop::option::of(text()),
            description in prop::option::of(text()),
            ip_access in prop::option::of(ip_entries()),
            enforce_tfa in any::<bool>(),
            admin_access in any::<bool>(),
            app_access in any::<bool>(),
        ) {
            let config = PolicyConfig {
                id: None,
                name,
                icon,
                description,
                ip_access,
                enforce_tfa: Some(enforce_tfa),
                admin_access: Some(admin_access),
                app_access: Some(app_access),
            };
            let body = serde_json::to_value(config.to_payload()).unwrap();
            let wire: PolicyWire = serde_json::from_value(body).unwrap();
            prop_assert_eq!(PolicyConfig::from_wire(wire), config);
        }

        /// Property: role config survives create payload -> wire -> config
        #[test]
        fn role_round_trip(
            name in text(),
            icon in prop::option::of(text()),
            description in prop::option::of(text()),
            parent in prop::option::of("r-[0-9a-f]{8}"),
        ) {
            let config = RoleConfig {
                id: None,
                name,
                icon,
                description,
                parent,
                children: None,
                users: None,
            };
            let body = serde_json::to_value(config.to_create_payload()).unwrap();
            let wire: RoleWire = serde_json::from_value(body).unwrap();
            prop_assert_eq!(RoleConfig::from_wire(wire), config);
        }

        /// Property: collection config survives create payload -> wire -> config
        #[test]
        fn collection_round_trip(
            collection in "[a-z][a-z0-9_]{0,15}",
            icon in prop::option::of(text()),
            note in prop::option::of(text()),
            hidden in any::<bool>(),
            singleton in any::<bool>(),
            sort_field in prop::option::of("[a-z_]{1,10}"),
            color in prop::option::of("#[0-9A-F]{6}"),
        ) {
            let config = CollectionConfig {
                collection,
                icon,
                note,
                hidden: Some(hidden),
                singleton: Some(singleton),
                sort_field,
                archive_field: None,
                color,
            };
            let body = serde_json::to_value(config.to_create_payload()).unwrap();
            let wire: CollectionWire = serde_json::from_value(body).unwrap();
            prop_assert_eq!(CollectionConfig::from_wire(wire), config);
        }
    }
}
