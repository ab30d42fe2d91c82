//! # Directus Provider Library
//!
//! This library maps declarative resource configuration onto the Directus
//! REST API. It is meant to sit underneath an infrastructure-as-code engine:
//! the engine owns planning and state storage, and calls into this crate to
//! create, read, update, delete and import individual resources.
//!
//! ## Quick Example
//!
//! ```no_run
//! use directus_provider::config::ProviderConfig;
//! use directus_provider::context::CallContext;
//! use directus_provider::provider::Provider;
//! use directus_provider::resources::{ManagedResource, RolePoliciesAttachment};
//! use std::time::Duration;
//!
//! let provider = Provider::configure(ProviderConfig::from_env()?)?;
//! let ctx = CallContext::background().with_timeout(Duration::from_secs(10));
//!
//! let attachment = RolePoliciesAttachment::new("role-id", ["policy-a", "policy-b"]);
//! let state = provider.role_policies().create(&ctx, &attachment)?;
//! assert_eq!(state.id.as_deref(), Some("role-id"));
//! # Ok::<(), directus_provider::error::Error>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: endpoint, static token and timeout, read
//!   from YAML and/or the `DIRECTUS_*` environment variables.
//! - **Client (`client`)**: a thin JSON-over-HTTP client behind the
//!   `Transport` trait, attaching the bearer token and decoding Directus
//!   error bodies.
//! - **Call context (`context`)**: caller-supplied deadline and cancellation
//!   consulted before every request.
//! - **Path resolution (`path`)**: system collections live at the root,
//!   everything else under `/items`.
//! - **Entity mappers (`models`)**: conversions between API JSON and typed,
//!   null-aware configuration.
//! - **Relation reconciliation (`reconcile`)**: converges a many-to-many
//!   link set with one read and at most one write.
//! - **Resources (`resources`)**: one orchestrator per managed kind.
//! - **Provider (`provider`)**: validated configuration plus a shared client,
//!   handing out the orchestrators.

pub mod client;
pub mod config;
pub mod context;
pub mod defaults;
pub mod error;
pub mod models;
pub mod path;
pub mod provider;
pub mod reconcile;
pub mod resources;

#[cfg(test)]
mod reconcile_proptest;

#[cfg(test)]
pub(crate) mod test_support;
