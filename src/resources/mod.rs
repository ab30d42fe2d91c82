//! # Resource Orchestrators
//!
//! One orchestrator per managed resource kind. Each composes an entity
//! mapper, the path resolver and the shared `Client` behind the
//! `ManagedResource` trait:
//!
//! - **create**: map the desired config to a create payload, send it, and
//!   return the state built from the response.
//! - **read**: re-fetch by the stored identifier and overwrite every mutable
//!   field. A `404` surfaces as an error for which `Error::is_not_found` is
//!   true; callers treat that as "gone remotely" and drop the resource.
//! - **update**: map the desired config to an update payload (immutable
//!   fields omitted) and return the refreshed state.
//! - **delete**: remove the remote object; may return non-fatal warnings.
//! - **import**: build full state from an externally known identifier.
//!
//! Every failure is wrapped in `Error::Resource`, naming the operation and
//! the identifier involved.

pub mod collection;
pub mod policy;
pub mod role;
pub mod role_policies;

use std::fmt;

use crate::context::CallContext;
use crate::error::{Error, Operation, Result};

pub use collection::CollectionResource;
pub use policy::PolicyResource;
pub use role::RoleResource;
pub use role_policies::{RolePoliciesAttachment, RolePoliciesAttachmentResource};

/// Non-fatal diagnostic reported alongside a successful operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub summary: String,
    pub detail: String,
}

impl Warning {
    pub fn new(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.summary, self.detail)
    }
}

pub(crate) fn require_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Validation {
            message: "name is required".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn require_import_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::Validation {
            message: "import id is required".to_string(),
        });
    }
    Ok(())
}

/// Identifier recorded by a previous create or import.
pub(crate) fn stored_id<'a>(
    id: Option<&'a str>,
    operation: Operation,
    kind: &'static str,
) -> Result<&'a str> {
    match id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(Error::Validation {
            message: "id is required".to_string(),
        }
        .in_resource(operation, kind, None)),
    }
}

/// CRUD plus import for one resource kind
pub trait ManagedResource {
    /// Stored state and desired configuration share one shape.
    type State;

    /// Human-readable kind used in error messages, e.g. `policy`.
    const KIND: &'static str;

    /// Resource type name exposed to the reconciliation engine.
    const TYPE_NAME: &'static str;

    fn create(&self, ctx: &CallContext, plan: &Self::State) -> Result<Self::State>;

    fn read(&self, ctx: &CallContext, state: &Self::State) -> Result<Self::State>;

    fn update(&self, ctx: &CallContext, plan: &Self::State) -> Result<Self::State>;

    fn delete(&self, ctx: &CallContext, state: &Self::State) -> Result<Vec<Warning>>;

    fn import(&self, ctx: &CallContext, id: &str) -> Result<Self::State>;
}
